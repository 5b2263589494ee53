//! Compile command implementation.
//!
//! Reads the package manifest, picks the destination file and hands the
//! generated configuration to the bundler's build runner.

use std::path::{Path, PathBuf};

use npm2cjs_bundler::{OptionBuilder, PackageDescriptor, build};
use tracing::{debug, info};

use crate::cli::CompileArgs;
use crate::config::Npm2cjsConfig;
use crate::error::{CliError, Result};

/// File stem used when neither the manifest nor the directory gives a name.
const FALLBACK_STEM: &str = "bundle";

/// Execute the compile command.
///
/// # Errors
///
/// Config and manifest problems are reported as such. Anything that goes
/// wrong inside the bundler surfaces as the uniform "build failed" error.
pub async fn execute(args: CompileArgs) -> Result<()> {
    let config = Npm2cjsConfig::load(&args)?;
    let settings = config.build_settings()?;

    if !args.package_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Package directory does not exist: {}",
            args.package_dir.display()
        )));
    }

    let package = PackageDescriptor::from_package_dir(&args.package_dir)?;
    let out_file = match &args.out {
        Some(path) => path.clone(),
        None => default_output_path(&config.out_dir, &package),
    };

    let builder = OptionBuilder::with_settings(settings);
    let (input, output) = builder.options(&package, &out_file);
    debug!(
        entry = %input.entry.display(),
        target = %builder.settings().target,
        minify = builder.settings().minify,
        "Compiling package"
    );

    build(&input, &output).await?;

    info!(
        "Compiled {} -> {}",
        package.name.as_deref().unwrap_or(FALLBACK_STEM),
        output.file.display()
    );
    Ok(())
}

/// `<out_dir>/<stem>.js`, where the stem comes from the package name or,
/// failing that, the package directory's name.
pub fn default_output_path(out_dir: &Path, package: &PackageDescriptor) -> PathBuf {
    out_dir.join(format!("{}.js", output_stem(package)))
}

fn output_stem(package: &PackageDescriptor) -> String {
    if let Some(name) = package.name.as_deref() {
        let stem = sanitize_package_name(name);
        if !stem.is_empty() {
            return stem;
        }
    }

    let dir_name = package
        .dir
        .file_name()
        .map(PathBuf::from)
        .or_else(|| {
            std::fs::canonicalize(&package.dir)
                .ok()
                .and_then(|p| p.file_name().map(PathBuf::from))
        });

    dir_name
        .map(|name| sanitize_package_name(&name.to_string_lossy()))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// `@scope/pkg` becomes `scope-pkg`; path separators never reach the file name.
fn sanitize_package_name(name: &str) -> String {
    name.trim()
        .trim_start_matches('@')
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_from_package_name() {
        let package = PackageDescriptor::new("node_modules/left-pad").name("left-pad");
        assert_eq!(
            default_output_path(Path::new("dist"), &package),
            PathBuf::from("dist/left-pad.js")
        );
    }

    #[test]
    fn test_scoped_name_is_flattened() {
        let package = PackageDescriptor::new("node_modules/@babel/core").name("@babel/core");
        assert_eq!(
            default_output_path(Path::new("out"), &package),
            PathBuf::from("out/babel-core.js")
        );
    }

    #[test]
    fn test_falls_back_to_directory_name() {
        let package = PackageDescriptor::new("vendor/tiny-lib");
        assert_eq!(
            default_output_path(Path::new("dist"), &package),
            PathBuf::from("dist/tiny-lib.js")
        );
    }

    #[test]
    fn test_blank_name_uses_directory() {
        let package = PackageDescriptor::new("vendor/tiny-lib").name("  ");
        assert_eq!(output_stem(&package), "tiny-lib");
    }
}
