//! Configuration with multi-source loading.
//!
//! Priority: CLI flags > `NPM2CJS_*` environment variables > config file > defaults

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized};
use npm2cjs_bundler::BuildSettings;
use npm2cjs_bundler::target::{ExportConditions, RuntimeTarget};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cli::CompileArgs;
use crate::error::{ConfigError, Result};

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "npm2cjs.config.json";

/// npm2cjs configuration - loaded from npm2cjs.config.json, env or CLI args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Npm2cjsConfig {
    /// Syntax baseline for the output (node<version>, es<year> or esnext)
    #[serde(default = "default_target")]
    pub target: String,

    /// Minify the output
    #[serde(default = "default_minify")]
    pub minify: bool,

    /// Resolution conditions, highest priority first
    ///
    /// Also accepts a comma separated string, which is how
    /// `NPM2CJS_CONDITIONS=node,default` arrives.
    #[serde(default = "default_conditions", deserialize_with = "list_or_joined")]
    #[schemars(with = "Vec<String>")]
    pub conditions: Vec<String>,

    /// Directory for output files when no explicit --out is given
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_target() -> String {
    RuntimeTarget::DEFAULT.to_string()
}

fn default_minify() -> bool {
    true
}

fn default_conditions() -> Vec<String> {
    ExportConditions::server().to_vec()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrJoined {
    List(Vec<String>),
    Joined(String),
}

fn list_or_joined<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ListOrJoined::deserialize(deserializer)? {
        ListOrJoined::List(list) => list,
        ListOrJoined::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

impl Default for Npm2cjsConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            minify: default_minify(),
            conditions: default_conditions(),
            out_dir: default_out_dir(),
        }
    }
}

/// Flags that were actually given on the command line.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<PathBuf>,
}

impl From<&CompileArgs> for CliOverrides {
    fn from(args: &CompileArgs) -> Self {
        Self {
            target: args.target.clone(),
            minify: args.no_minify.then_some(false),
            conditions: args.conditions.clone(),
            out_dir: args.out_dir.clone(),
        }
    }
}

impl Npm2cjsConfig {
    /// Load configuration for a compile invocation.
    ///
    /// An explicit `--config` file must exist. Without it,
    /// `./npm2cjs.config.json` is used when present.
    pub fn load(args: &CompileArgs) -> Result<Self> {
        let config_file = match &args.config {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.clone()).into());
            }
            Some(path) => Some(path.clone()),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        Self::figment(config_file.as_deref(), CliOverrides::from(args))
            .extract()
            .map_err(|e| {
                ConfigError::InvalidValue {
                    field: "configuration".to_string(),
                    value: e.to_string(),
                    hint: format!("Check {} syntax and field types", DEFAULT_CONFIG_FILE),
                }
                .into()
            })
    }

    fn figment(config_file: Option<&Path>, overrides: CliOverrides) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }

        figment
            .merge(Env::prefixed("NPM2CJS_").only(&["target", "minify", "conditions", "out_dir"]))
            .merge(Serialized::defaults(overrides))
    }

    /// Validate and convert into the bundler's stage settings.
    pub fn build_settings(&self) -> Result<BuildSettings> {
        let target: RuntimeTarget = self.target.parse().map_err(|hint| ConfigError::InvalidValue {
            field: "target".to_string(),
            value: self.target.clone(),
            hint,
        })?;

        if self.conditions.is_empty() || self.conditions.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "conditions".to_string(),
                value: format!("{:?}", self.conditions),
                hint: "Provide at least one non-empty condition name, e.g. [\"node\", \"default\"]"
                    .to_string(),
            }
            .into());
        }

        Ok(BuildSettings {
            target,
            minify: self.minify,
            conditions: ExportConditions::new(self.conditions.iter().map(|c| c.trim())),
        })
    }

    /// Generate the JSON Schema for npm2cjs.config.json.
    pub fn json_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(Npm2cjsConfig);
        Ok(serde_json::to_value(schema)?)
    }
}
