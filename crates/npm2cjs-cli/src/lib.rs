//! npm2cjs CLI - convert installed npm packages into single CommonJS files.
//!
//! - [`cli`] - argument definitions (clap)
//! - [`config`] - layered configuration (defaults, file, environment, flags)
//! - [`commands`] - subcommand implementations
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing subscriber setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, ConfigError, Result};
