// ABOUTME: Config values that are either literal or read from the environment.
// ABOUTME: Keeps secrets such as the API key out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;

/// `api_key: abc` or `api_key: { env: HEROKU_API_KEY, default: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve to a concrete string.
    ///
    /// An env var set to the empty string counts as unset and falls through to
    /// `default`. An exported-but-empty `HEROKU_API_KEY` would otherwise become
    /// a blank key and fail every request with 401.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }
}
