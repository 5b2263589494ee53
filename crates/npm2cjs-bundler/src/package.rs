//! Package metadata used to pick the entry file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Where an installed package lives and which entry fields it declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageDescriptor {
    /// Package root directory (the folder holding `package.json`).
    pub dir: PathBuf,
    /// Package name from the manifest, when known.
    pub name: Option<String>,
    /// Declared primary entry (`main`), relative to `dir`.
    pub main: Option<String>,
    /// Declared ES module entry (`module`).
    ///
    /// Accepted for completeness but never used to choose the entry file.
    pub module: Option<String>,
}

/// Failure reading a package manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The `package.json` fields we care about. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct Manifest {
    name: Option<String>,
    main: Option<String>,
    module: Option<String>,
}

impl PackageDescriptor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Read `<dir>/package.json` and fill in `name`, `main` and `module`.
    ///
    /// Empty strings are treated as absent, matching how Node falls back to
    /// `index.js` for `"main": ""`.
    pub fn from_package_dir(dir: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let dir = dir.as_ref();
        let path = dir.join("package.json");
        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            name: non_empty(manifest.name),
            main: non_empty(manifest.main),
            module: non_empty(manifest.module),
        })
    }

    /// Entry path relative to the package root: `main`, or `index.js`.
    pub fn entry_relative(&self) -> &str {
        self.main.as_deref().unwrap_or("index.js")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
