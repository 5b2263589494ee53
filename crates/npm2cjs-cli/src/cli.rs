//! Command-line interface definition.
//!
//! - `npm2cjs compile <PACKAGE_DIR>` - convert a package
//! - `npm2cjs schema` - print the JSON schema of `npm2cjs.config.json`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// npm2cjs - bundle an installed npm package into one CommonJS file
#[derive(Parser, Debug)]
#[command(
    name = "npm2cjs",
    version,
    about = "Bundle an installed npm package into one minified CommonJS file",
    long_about = "npm2cjs takes the entry module of an installed package, bundles its local\n\
                  dependency closure with Rolldown and writes a single minified CommonJS file\n\
                  that old Node.js runtimes can require."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows build phases and every rendered chunk.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a package into a single CommonJS file
    Compile(CompileArgs),

    /// Print the JSON schema for npm2cjs.config.json
    Schema,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Package root directory (the folder containing package.json)
    #[arg(value_name = "PACKAGE_DIR")]
    pub package_dir: PathBuf,

    /// Destination file [default: <out_dir>/<package name>.js]
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output directory used when --out is not given
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Syntax baseline, e.g. node6, node12, es2015
    #[arg(long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Keep the output readable
    #[arg(long)]
    pub no_minify: bool,

    /// Resolution conditions in priority order (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub conditions: Option<Vec<String>>,

    /// Path to a JSON config file [default: ./npm2cjs.config.json if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile_minimal() {
        let cli = Cli::try_parse_from(["npm2cjs", "compile", "node_modules/chalk"]).unwrap();
        let Command::Compile(args) = cli.command else {
            panic!("expected compile command");
        };
        assert_eq!(args.package_dir, PathBuf::from("node_modules/chalk"));
        assert!(args.out.is_none());
        assert!(!args.no_minify);
        assert!(args.conditions.is_none());
    }

    #[test]
    fn test_parse_compile_all_flags() {
        let cli = Cli::try_parse_from([
            "npm2cjs",
            "-v",
            "compile",
            "pkg",
            "--out",
            "dist/pkg.js",
            "--target",
            "node8",
            "--no-minify",
            "--conditions",
            "node,require",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Compile(args) = cli.command else {
            panic!("expected compile command");
        };
        assert_eq!(args.out, Some(PathBuf::from("dist/pkg.js")));
        assert_eq!(args.target.as_deref(), Some("node8"));
        assert!(args.no_minify);
        assert_eq!(
            args.conditions,
            Some(vec!["node".to_string(), "require".to_string()])
        );
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["npm2cjs", "-v", "-q", "compile", "pkg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compile_requires_package_dir() {
        assert!(Cli::try_parse_from(["npm2cjs", "compile"]).is_err());
    }

    #[test]
    fn test_parse_schema() {
        let cli = Cli::try_parse_from(["npm2cjs", "schema"]).unwrap();
        assert!(matches!(cli.command, Command::Schema));
    }
}
