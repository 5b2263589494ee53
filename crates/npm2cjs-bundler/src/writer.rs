//! Persisting rendered output to the destination file.
//!
//! The bundle is rendered in memory and exactly one chunk is expected. Its code
//! is written next to the destination under a temporary name and renamed into
//! place, so readers never observe a half-written file. Failures before the
//! rename may leave the temporary file behind; it is removed on a best-effort
//! basis.

use std::fs;
use std::path::{Path, PathBuf};

use rolldown::BundleOutput;
use rolldown_common::Output;

use crate::{Error, Result};

/// Write the single entry chunk of `output` to `file`.
///
/// Parent directories are created as needed and an existing file is replaced.
///
/// # Errors
///
/// - [`Error::UnexpectedChunks`] unless the bundle holds exactly one chunk
/// - [`Error::InvalidOutputPath`] if `file` has no file name or is a directory
/// - [`Error::WriteFailure`] for any I/O failure
pub fn write_output_file(output: &BundleOutput, file: &Path) -> Result<()> {
    let mut chunks = output.assets.iter().filter_map(|item| match item {
        Output::Chunk(chunk) => Some(chunk),
        Output::Asset(_) => None,
    });

    let (Some(chunk), None) = (chunks.next(), chunks.next()) else {
        let count = output
            .assets
            .iter()
            .filter(|item| matches!(item, Output::Chunk(_)))
            .count();
        return Err(Error::UnexpectedChunks { chunks: count });
    };

    write_file_atomic(file, chunk.code.as_bytes())
}

/// Write `content` to `target` through a temporary sibling file and a rename.
pub(crate) fn write_file_atomic(target: &Path, content: &[u8]) -> Result<()> {
    validate_target(target)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(target);
    fs::write(&temp_path, content).map_err(|e| {
        cleanup_temp_file(&temp_path);
        Error::WriteFailure(format!(
            "Failed to write temporary file '{}': {}",
            temp_path.display(),
            e
        ))
    })?;

    fs::rename(&temp_path, target).map_err(|e| {
        cleanup_temp_file(&temp_path);
        Error::WriteFailure(format!(
            "Failed to rename '{}' to '{}': {}",
            temp_path.display(),
            target.display(),
            e
        ))
    })?;

    Ok(())
}

fn validate_target(target: &Path) -> Result<()> {
    if target.file_name().is_none() {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' does not name a file",
            target.display()
        )));
    }
    if target.is_dir() {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' is a directory",
            target.display()
        )));
    }
    Ok(())
}

/// `dist/pkg.js` -> `dist/.pkg.js.tmp`
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

/// Best-effort cleanup - we're already in an error state.
fn cleanup_temp_file(temp_path: &Path) {
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(temp_path) {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "failed to clean up temporary file"
            );
        }
    }
}
