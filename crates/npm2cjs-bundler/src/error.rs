//! Error types for npm2cjs-bundler.
//!
//! Two layers exist. [`Error`] carries the concrete cause reported by Rolldown
//! or the filesystem and never leaves the crate's build boundary. [`CompileError`]
//! is the only error callers of [`crate::compile`] and [`crate::build`] see.

use crate::diagnostics::{self, ExtractedDiagnostic};

/// Concrete failure inside a build, before it is wrapped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<ExtractedDiagnostic>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid output path (empty, or names a directory).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Rendering did not produce exactly one entry chunk.
    #[error("Expected a single entry chunk, rendered {chunks} chunk(s)")]
    UnexpectedChunks { chunks: usize },
}

/// Result type alias for internal npm2cjs-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error.
    ///
    /// Extracts structured diagnostics from Rolldown's error types.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(error))
    }
}

/// Format bundler error diagnostics for display.
fn format_bundler_error(diagnostics: &[ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [diag] => format!("{}: {}", diag.kind, diag.message),
        many => format!(
            "{} errors: {}",
            many.len(),
            many.iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::UnexpectedChunks { .. } => "UNEXPECTED_CHUNKS",
        }))
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::UnexpectedChunks { .. } => Some(Box::new(
                "Dynamic imports are inlined; more than one chunk usually means several entries were configured.",
            )),
            Error::Bundler(diagnostics) => match diagnostics.as_slice() {
                [diag] => diag
                    .help
                    .as_ref()
                    .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>),
                _ => None,
            },
            _ => None,
        }
    }
}

/// The single failure kind reported by a build.
///
/// Whatever went wrong (missing entry, unresolved import, syntax error, write
/// failure), callers get the same message and category. The original cause is
/// emitted as a `tracing` error event before it is discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    message: String,
    category: String,
}

impl CompileError {
    /// Message carried by every wrapped build failure.
    pub const BUILD_FAILED: &'static str = "build failed";

    /// Category label identifying the compile subsystem.
    pub const CATEGORY: &'static str = "Npm2cjs/compile Error";

    /// Create a custom error with the given message and category.
    pub fn new(message: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: category.into(),
        }
    }

    /// The uniform "build failed" error.
    pub fn build_failed() -> Self {
        Self::new(Self::BUILD_FAILED, Self::CATEGORY)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl miette::Diagnostic for CompileError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(&self.category))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(
            "Run with RUST_LOG=npm2cjs_bundler=debug to see the underlying bundler error.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, DiagnosticSeverity};
    use miette::Diagnostic;

    fn diagnostic(kind: DiagnosticKind, message: &str) -> ExtractedDiagnostic {
        ExtractedDiagnostic {
            kind,
            severity: DiagnosticSeverity::Error,
            message: message.to_string(),
            file: None,
            help: None,
        }
    }

    #[test]
    fn test_build_failed_is_uniform() {
        let err = CompileError::build_failed();
        assert_eq!(err.message(), "build failed");
        assert_eq!(err.category(), "Npm2cjs/compile Error");
        assert_eq!(err.to_string(), "build failed");
        assert_eq!(err, CompileError::build_failed());
    }

    #[test]
    fn test_compile_error_code_is_category() {
        let err = CompileError::build_failed();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some(CompileError::CATEGORY));
    }

    #[test]
    fn test_bundler_error_display_single() {
        let err = Error::Bundler(vec![diagnostic(
            DiagnosticKind::UnresolvedImport,
            "Could not resolve './missing'",
        )]);
        assert_eq!(
            err.to_string(),
            "Rolldown bundler error: UnresolvedImport: Could not resolve './missing'"
        );
    }

    #[test]
    fn test_bundler_error_display_many() {
        let err = Error::Bundler(vec![
            diagnostic(DiagnosticKind::ParseError, "Unexpected token"),
            diagnostic(DiagnosticKind::Transform, "bad syntax"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 errors"));
        assert!(msg.contains("ParseError: Unexpected token"));
        assert!(msg.contains("Transform: bad syntax"));
    }

    #[test]
    fn test_bundler_error_display_empty() {
        let err = Error::Bundler(Vec::new());
        assert!(err.to_string().contains("Unknown bundler error"));
    }

    #[test]
    fn test_error_codes() {
        let err = Error::UnexpectedChunks { chunks: 2 };
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("UNEXPECTED_CHUNKS")
        );
        assert!(err.to_string().contains("2 chunk(s)"));
    }
}
