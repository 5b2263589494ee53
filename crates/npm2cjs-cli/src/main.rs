//! npm2cjs CLI entry point.
//!
//! Parses arguments, initializes logging and dispatches the subcommand.

use clap::Parser;
use miette::Result;
use npm2cjs_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color || !logger::should_use_colors());

    let result = match args.command {
        cli::Command::Compile(compile_args) => commands::compile_execute(compile_args).await,
        cli::Command::Schema => commands::schema_execute(),
    };

    result.map_err(error::cli_error_to_miette)
}
