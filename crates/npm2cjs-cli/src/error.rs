//! Error handling for the npm2cjs CLI.
//!
//! - `CliError` is what commands return
//! - `ConfigError` covers config file loading and validation
//!
//! Build failures arrive as the bundler's uniform [`CompileError`] and are
//! reported with its category as the diagnostic code.

use std::path::PathBuf;

use miette::Report;
use npm2cjs_bundler::{CompileError, ManifestError};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid value, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The package directory has no readable package.json
    #[error("{0}")]
    Manifest(#[from] ManifestError),

    /// The bundler reported a failed build
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the given location
    #[error("Config file not found: {}\n\nHint: Create an npm2cjs.config.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Compile(e) => Report::new(e),
        CliError::Manifest(e) => miette::miette!(
            help = "Point npm2cjs at an installed package directory (e.g. node_modules/<name>)",
            "{}",
            e
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("npm2cjs.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("npm2cjs.config.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "target".to_string(),
            value: "chrome80".to_string(),
            hint: "Use node<version>".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'target'"));
        assert!(msg.contains("chrome80"));
    }

    #[test]
    fn test_compile_error_is_transparent() {
        let err: CliError = CompileError::build_failed().into();
        assert_eq!(err.to_string(), "build failed");
    }

    #[test]
    fn test_compile_error_report_keeps_category() {
        let report = cli_error_to_miette(CompileError::build_failed().into());
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some(CompileError::CATEGORY));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::NotFound(PathBuf::from("x.json")).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }
}
