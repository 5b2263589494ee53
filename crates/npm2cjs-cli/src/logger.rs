//! Logging setup for the npm2cjs CLI.
//!
//! - `--verbose`: debug level for npm2cjs crates (build phases, rendered chunks)
//! - `--quiet`: errors only
//! - otherwise `RUST_LOG`, falling back to info
//!
//! ```rust,no_run
//! use npm2cjs_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "npm2cjs_bundler=debug,npm2cjs_cli=debug";
const QUIET_FILTER: &str = "npm2cjs_bundler=error,npm2cjs_cli=error";
const DEFAULT_FILTER: &str = "npm2cjs_bundler=info,npm2cjs_cli=info";

/// Install the global tracing subscriber.
///
/// Call once, before any logging. `verbose` wins over `RUST_LOG`; clap already
/// rejects `--verbose` together with `--quiet`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether colored output should be used.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
