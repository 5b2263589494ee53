//! Shared test utilities for npm2cjs-bundler tests
//!
//! Builds throwaway package layouts on disk so each test drives a real build.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A temporary project holding one package under test.
pub struct PackageFixture {
    temp: TempDir,
}

impl PackageFixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("temp dir"),
        }
    }

    /// Root of the temporary project.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Directory of the package being converted.
    pub fn package_dir(&self) -> PathBuf {
        self.root().join("pkg")
    }

    /// Write a file relative to the package directory.
    pub fn file(self, relative: &str, content: &str) -> Self {
        write(&self.package_dir().join(relative), content);
        self
    }

    /// Write a dependency under the package's own `node_modules`.
    pub fn dependency(self, name: &str, files: &[(&str, &str)]) -> Self {
        let dep_dir = self.package_dir().join("node_modules").join(name);
        for (relative, content) in files {
            write(&dep_dir.join(relative), content);
        }
        self
    }

    /// Destination path inside the project's `dist` folder.
    pub fn output(&self, name: &str) -> PathBuf {
        self.root().join("dist").join(name)
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write fixture file");
}

/// Read the output file, panicking with context if it is missing.
pub fn read_output(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("output {} should exist: {}", path.display(), e))
}

/// Assert that the output contains a substring
pub fn assert_output_contains(code: &str, substring: &str) {
    assert!(
        code.contains(substring),
        "Expected output to contain '{}', but it didn't.\nOutput preview (first 500 chars): {}",
        substring,
        &code[..code.len().min(500)]
    );
}

/// Assert that the output does NOT contain a substring
pub fn assert_output_not_contains(code: &str, substring: &str) {
    assert!(
        !code.contains(substring),
        "Expected output NOT to contain '{}', but it did.\nOutput preview (first 500 chars): {}",
        substring,
        &code[..code.len().min(500)]
    );
}

/// Run `script` with `node -e`, passing `module` as `process.argv[1]`.
///
/// Returns trimmed stdout, or `None` when no `node` binary is on the PATH.
pub fn run_node(script: &str, module: &Path) -> Option<String> {
    let output = match Command::new("node").arg("-e").arg(script).arg(module).output() {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("node not found, skipping runtime check");
            return None;
        }
        Err(e) => panic!("failed to spawn node: {}", e),
    };
    assert!(
        output.status.success(),
        "node exited with {}:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
