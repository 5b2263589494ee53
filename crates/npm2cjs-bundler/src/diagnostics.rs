//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown reports failures as batches of build diagnostics whose concrete
//! types shift between releases. We only need enough structure to log a useful
//! line before the failure is wrapped into [`crate::CompileError`], so the
//! extraction works off the `Debug` rendering.

use serde::{Deserialize, Serialize};

/// Extracted diagnostic information from Rolldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
    pub help: Option<String>,
}

/// Diagnostic kind (mirrors the subset of Rolldown's EventKind we distinguish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    InvalidOption,
    Transform,
    Other,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::UnresolvedEntry => "UnresolvedEntry",
            DiagnosticKind::UnresolvedImport => "UnresolvedImport",
            DiagnosticKind::InvalidOption => "InvalidOption",
            DiagnosticKind::Transform => "Transform",
            DiagnosticKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Extract diagnostics from Rolldown error types.
///
/// A batched error yields one diagnostic per entry; anything else yields one.
pub fn extract_from_rolldown_error(error: &dyn std::fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let error_str = format!("{error:?}");

    let parts: Vec<&str> = error_str
        .split("BatchedBuildDiagnostic")
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect();

    if parts.len() > 1 {
        parts.iter().map(|part| extract_single(part)).collect()
    } else {
        vec![extract_single(&error_str)]
    }
}

/// Extract a single diagnostic from a formatted error string.
fn extract_single(error_str: &str) -> ExtractedDiagnostic {
    ExtractedDiagnostic {
        kind: classify(error_str),
        severity: if error_str.contains("warning") || error_str.contains("Warning") {
            DiagnosticSeverity::Warning
        } else {
            DiagnosticSeverity::Error
        },
        message: error_str.trim().to_string(),
        file: extract_file_path(error_str),
        help: extract_help_text(error_str),
    }
}

fn classify(error_str: &str) -> DiagnosticKind {
    // Entry checks go first: an unresolved entry message also mentions "resolve".
    if error_str.contains("UnresolvedEntry") || error_str.contains("Cannot resolve entry") {
        DiagnosticKind::UnresolvedEntry
    } else if error_str.contains("UnresolvedImport")
        || error_str.contains("Could not resolve")
        || error_str.contains("Cannot resolve")
    {
        DiagnosticKind::UnresolvedImport
    } else if error_str.contains("Parse error")
        || error_str.contains("Syntax")
        || error_str.contains("Unexpected token")
    {
        DiagnosticKind::ParseError
    } else if error_str.contains("InvalidOption") {
        DiagnosticKind::InvalidOption
    } else if error_str.contains("Transform") || error_str.contains("transform") {
        DiagnosticKind::Transform
    } else {
        DiagnosticKind::Other
    }
}

/// Extract file path from error message.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in &[".json", ".mjs", ".cjs", ".js"] {
        let Some(pos) = text.find(ext) else {
            continue;
        };
        let before = &text[..pos + ext.len()];
        for indicator in &["in ", "at ", "file: ", "path: ", "\"", "'"] {
            if let Some(start) = before.rfind(indicator) {
                let path_str = before[start + indicator.len()..].trim();
                if !path_str.is_empty() && !path_str.contains(char::is_whitespace) {
                    return Some(path_str.to_string());
                }
            }
        }
    }
    None
}

/// Extract help text from error message.
fn extract_help_text(text: &str) -> Option<String> {
    for indicator in &["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help_str = text[pos + indicator.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim_matches(|c: char| c.is_whitespace() || c == '"');
            if !help_str.is_empty() {
                return Some(help_str.to_string());
            }
        }
    }
    None
}
