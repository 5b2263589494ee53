//! Runtime target types.
//!
//! - `ExportConditions`: which `exports`/`imports` conditions win during resolution
//! - `RuntimeTarget`: the syntax baseline the output is lowered to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Export conditions for module resolution, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportConditions(Vec<String>);

impl ExportConditions {
    /// Conditions for server-side execution: `["node", "default", "module", "import"]`.
    ///
    /// `node` comes first so packages shipping both a browser and a Node build
    /// (see the `imports`/`exports` maps of chalk 5) resolve to the Node one.
    pub fn server() -> Self {
        Self::new(["node", "default", "module", "import"])
    }

    pub fn new<I, S>(conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(conditions.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Convert to a Vec<String> for Rolldown compatibility
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExportConditions {
    fn default() -> Self {
        Self::server()
    }
}

/// Syntax baseline for transpilation, e.g. `node6` or `es2015`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeTarget(String);

impl RuntimeTarget {
    /// Default baseline: Node.js 6.
    pub const DEFAULT: &'static str = "node6";

    pub fn node(major: u32) -> Self {
        Self(format!("node{major}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RuntimeTarget {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for RuntimeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RuntimeTarget {
    type Err = String;

    /// Accepts `node<major>[.<minor>[.<patch>]]`, `es<year>` and `esnext`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let valid = if lower == "esnext" {
            true
        } else if let Some(version) = lower.strip_prefix("node") {
            !version.is_empty()
                && version
                    .split('.')
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        } else if let Some(year) = lower.strip_prefix("es") {
            !year.is_empty() && year.chars().all(|c| c.is_ascii_digit())
        } else {
            false
        };

        if valid {
            Ok(Self(lower))
        } else {
            Err(format!(
                "Invalid target: '{}'. Expected node<version>, es<year> or esnext",
                s
            ))
        }
    }
}

impl TryFrom<String> for RuntimeTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeTarget> for String {
    fn from(target: RuntimeTarget) -> Self {
        target.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_conditions_order() {
        let conditions = ExportConditions::server();
        assert_eq!(
            conditions.as_slice(),
            &["node", "default", "module", "import"]
        );
        assert!(conditions.contains("node"));
        assert!(!conditions.contains("browser"));
    }

    #[test]
    fn test_default_is_server() {
        assert_eq!(ExportConditions::default(), ExportConditions::server());
    }

    #[test]
    fn test_target_parse() {
        assert_eq!("node6".parse::<RuntimeTarget>().unwrap().as_str(), "node6");
        assert_eq!("Node12.22".parse::<RuntimeTarget>().unwrap().as_str(), "node12.22");
        assert_eq!("es2015".parse::<RuntimeTarget>().unwrap().as_str(), "es2015");
        assert_eq!("ESNext".parse::<RuntimeTarget>().unwrap().as_str(), "esnext");
    }

    #[test]
    fn test_target_parse_invalid() {
        assert!("node".parse::<RuntimeTarget>().is_err());
        assert!("node6.".parse::<RuntimeTarget>().is_err());
        assert!("chrome80".parse::<RuntimeTarget>().is_err());
        assert!("".parse::<RuntimeTarget>().is_err());
    }

    #[test]
    fn test_target_default() {
        assert_eq!(RuntimeTarget::default(), RuntimeTarget::node(6));
        assert_eq!(RuntimeTarget::default().to_string(), "node6");
    }
}
