//! # npm2cjs-bundler
//!
//! Turns the entry module of an installed npm package into a single, minified
//! CommonJS file that old Node.js runtimes can `require`.
//!
//! The heavy lifting is done by Rolldown. This crate only decides *how* Rolldown
//! is configured (a fixed, ordered list of [`TransformStage`]s) and drives it
//! through a build → render → persist → release lifecycle.
//!
//! ## Quick Start
//!
//! ```no_run
//! use npm2cjs_bundler::{PackageDescriptor, compile};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = PackageDescriptor::new("node_modules/chalk").main("source/index.js");
//! compile(&package, "dist/chalk.js").await?;
//! # Ok(()) }
//! ```
//!
//! ### Inspecting the configuration
//!
//! ```
//! use npm2cjs_bundler::{PackageDescriptor, get_options};
//!
//! let package = PackageDescriptor::new("/pkg");
//! let (input, output) = get_options(&package, "/out/pkg.js");
//! assert!(input.entry.ends_with("index.js"));
//! assert_eq!(output.file.to_str(), Some("/out/pkg.js"));
//! ```

pub mod diagnostics;
pub mod error;
pub mod options;
pub mod package;
pub mod runner;
pub mod stages;
pub mod target;
pub mod writer;

pub use error::{CompileError, Error, Result};
pub use options::{BuildInputConfig, BuildOutputConfig, BuildSettings, OptionBuilder, get_options};
pub use package::{ManifestError, PackageDescriptor};
pub use runner::{BuildPhase, build};
pub use stages::TransformStage;
pub use target::ExportConditions;

// Re-export the Rolldown types that appear in public signatures
pub use rolldown::{BundleOutput, BundlerOptions, OutputFormat, Platform};

use std::path::Path;

/// Convert a package's entry module into one CommonJS file at `output_file`.
///
/// This is [`get_options`] followed by [`build`]. Any failure surfaces as the
/// single [`CompileError`] kind; the underlying cause is only logged.
pub async fn compile(
    package: &PackageDescriptor,
    output_file: impl AsRef<Path>,
) -> std::result::Result<(), CompileError> {
    let (input, output) = get_options(package, output_file);
    build(&input, &output).await
}
