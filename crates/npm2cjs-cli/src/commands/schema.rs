//! Schema command implementation.

use crate::config::Npm2cjsConfig;
use crate::error::Result;

/// Print the JSON schema for `npm2cjs.config.json` to stdout.
pub fn execute() -> Result<()> {
    let schema = Npm2cjsConfig::json_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
