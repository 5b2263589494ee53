//! The fixed transformation stages applied to every build.
//!
//! Rolldown handles CommonJS interop, node-style resolution, JSON modules and
//! oxc-based lowering/minification natively. A [`TransformStage`] is therefore
//! a descriptor, not a plugin: applying it sets the engine options that turn
//! the corresponding behaviour on.

use std::path::Path;

use either::Either;
use rolldown::{BundlerOptions, Platform, RawMinifyOptions, ResolveOptions};
use rolldown_common::{BundlerTransformOptions, ModuleType};
use rustc_hash::FxHashMap;

use crate::target::{ExportConditions, RuntimeTarget};

/// One stage of the build pipeline with its static parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformStage {
    /// Rewrite `require`/`module.exports` modules into statically analyzable form.
    Interop,
    /// Locate dependencies on disk, preferring `conditions` in order.
    Resolve { conditions: ExportConditions },
    /// Import `.json` files as structured data.
    Json,
    /// Lower syntax to `target` and optionally minify the output.
    Transpile { target: RuntimeTarget, minify: bool },
}

impl TransformStage {
    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interop => "interop",
            Self::Resolve { .. } => "resolve",
            Self::Json => "json",
            Self::Transpile { .. } => "transpile",
        }
    }

    /// Apply this stage to the engine options.
    ///
    /// `root` is the package root; resolution walks `node_modules` upward from it.
    pub fn apply(&self, options: &mut BundlerOptions, root: &Path) {
        match self {
            Self::Interop => {
                options.platform = Some(Platform::Node);
                module_types(options).insert(".cjs".to_string(), ModuleType::Js);
            }
            Self::Resolve { conditions } => {
                options.resolve = Some(configure_resolution(root, conditions));
            }
            Self::Json => {
                module_types(options).insert(".json".to_string(), ModuleType::Json);
            }
            Self::Transpile { target, minify } => {
                let transform = options
                    .transform
                    .get_or_insert_with(BundlerTransformOptions::default);
                transform.target = Some(Either::Left(target.as_str().to_string()));

                options.minify = minify.then(|| RawMinifyOptions::from(true));
            }
        }
    }
}

fn module_types(options: &mut BundlerOptions) -> &mut FxHashMap<String, ModuleType> {
    options.module_types.get_or_insert_with(FxHashMap::default)
}

/// Configure module resolution options.
fn configure_resolution(root: &Path, conditions: &ExportConditions) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current = Some(root);
    while let Some(dir) = current {
        modules.push(dir.join("node_modules").to_string_lossy().into_owned());
        current = dir.parent();
    }
    modules.push("node_modules".to_string());

    ResolveOptions {
        main_fields: Some(vec!["main".to_string(), "module".to_string()]),
        condition_names: Some(conditions.to_vec()),
        extensions: Some(vec![
            ".js".to_string(),
            ".json".to_string(),
            ".mjs".to_string(),
            ".cjs".to_string(),
        ]),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}
