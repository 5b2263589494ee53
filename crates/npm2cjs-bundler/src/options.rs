//! Option Builder: package metadata in, engine configuration out.
//!
//! Building options is pure data assembly. Nothing here touches the
//! filesystem beyond reading the process working directory to absolutize
//! relative paths, and nothing here can fail.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rolldown::{BundlerOptions, InputItem, OutputFormat};
use serde::{Deserialize, Serialize};

use crate::package::PackageDescriptor;
use crate::stages::TransformStage;
use crate::target::{ExportConditions, RuntimeTarget};

/// Static parameters of the stage list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildSettings {
    /// Syntax baseline for the output.
    pub target: RuntimeTarget,
    /// Minify the rendered chunk.
    pub minify: bool,
    /// Resolution conditions, highest priority first.
    pub conditions: ExportConditions,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            target: RuntimeTarget::default(),
            minify: true,
            conditions: ExportConditions::server(),
        }
    }
}

/// What to build: the entry file and the stages applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputConfig {
    /// Absolute path of the entry file.
    pub entry: PathBuf,
    /// Package root; anchors `node_modules` lookup.
    pub root: PathBuf,
    /// Stages in application order.
    pub stages: Vec<TransformStage>,
}

/// Where to write and in which module format.
#[derive(Debug, Clone)]
pub struct BuildOutputConfig {
    /// Absolute destination file path.
    pub file: PathBuf,
    pub format: OutputFormat,
}

// `OutputFormat` has no `PartialEq`; it is a fieldless enum, so the
// discriminant identifies the format.
impl PartialEq for BuildOutputConfig {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
            && std::mem::discriminant(&self.format) == std::mem::discriminant(&other.format)
    }
}

impl Eq for BuildOutputConfig {}

impl BuildInputConfig {
    /// Merge input and output configuration into Rolldown options.
    pub fn to_bundler_options(&self, output: &BuildOutputConfig) -> BundlerOptions {
        let mut options = BundlerOptions {
            input: Some(vec![InputItem {
                name: None,
                import: self.entry.to_string_lossy().into_owned(),
            }]),
            cwd: Some(self.root.clone()),
            format: Some(output.format),
            // One output file: dynamic imports must not become extra chunks.
            inline_dynamic_imports: Some(true),
            ..Default::default()
        };

        for stage in &self.stages {
            stage.apply(&mut options, &self.root);
        }

        options
    }
}

/// Produces build configurations from package metadata.
#[derive(Debug, Clone, Default)]
pub struct OptionBuilder {
    settings: BuildSettings,
}

impl OptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BuildSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// The ordered stage list: interop, resolve, json, transpile.
    pub fn stages(&self) -> Vec<TransformStage> {
        vec![
            TransformStage::Interop,
            TransformStage::Resolve {
                conditions: self.settings.conditions.clone(),
            },
            TransformStage::Json,
            TransformStage::Transpile {
                target: self.settings.target.clone(),
                minify: self.settings.minify,
            },
        ]
    }

    /// Build the input and output configuration for `package`.
    ///
    /// The entry is `<dir>/<main>`, or `<dir>/index.js` when `main` is unset.
    /// The package's `module` field is not consulted.
    pub fn options(
        &self,
        package: &PackageDescriptor,
        output_file: impl AsRef<Path>,
    ) -> (BuildInputConfig, BuildOutputConfig) {
        let root = absolutize(&package.dir);
        let entry = root.join(package.entry_relative()).clean();

        let input = BuildInputConfig {
            entry,
            root,
            stages: self.stages(),
        };
        let output = BuildOutputConfig {
            file: absolutize(output_file.as_ref()),
            format: OutputFormat::Cjs,
        };

        (input, output)
    }
}

/// Build configurations with the default settings.
pub fn get_options(
    package: &PackageDescriptor,
    output_file: impl AsRef<Path>,
) -> (BuildInputConfig, BuildOutputConfig) {
    OptionBuilder::default().options(package, output_file)
}

/// Make `path` absolute against the current directory and clean it.
///
/// If the current directory cannot be read the cleaned path is returned as is.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.clean();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path).clean(),
        Err(_) => path.clean(),
    }
}
