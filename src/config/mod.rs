// ABOUTME: Configuration types and parsing for liftoff.yml.
// ABOUTME: Handles YAML parsing, env-referenced API keys and conversion into wrapper options.

mod env_value;

pub use env_value::EnvValue;

use crate::api::{ApiConfig, DEFAULT_API_URL};
use crate::error::{Error, Result};
use crate::rendezvous::RendezvousConfig;
use crate::types::AppName;
use crate::wrapper::WrapperOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "liftoff.yml";
pub const CONFIG_FILENAME_ALT: &str = "liftoff.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".liftoff/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_app_name")]
    pub app: Option<AppName>,

    #[serde(default)]
    pub api_key: Option<EnvValue>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,

    #[serde(default)]
    pub rendezvous: RendezvousSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendezvousSettings {
    #[serde(default = "default_activity_timeout", with = "humantime_serde")]
    pub activity_timeout: Duration,
}

impl Default for RendezvousSettings {
    fn default() -> Self {
        Self {
            activity_timeout: default_activity_timeout(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_activity_timeout() -> Duration {
    Duration::from_secs(3600)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: None,
            api_key: None,
            api_url: default_api_url(),
            ca_bundle: None,
            rendezvous: RendezvousSettings::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like `discover`, but a missing file yields the defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        let config = ApiConfig::default().base_url(self.api_url.clone());
        match &self.ca_bundle {
            Some(path) => config.ca_bundle(path.clone()),
            None => config,
        }
    }

    pub fn rendezvous_config(&self) -> RendezvousConfig {
        let config =
            RendezvousConfig::default().activity_timeout(self.rendezvous.activity_timeout);
        match &self.ca_bundle {
            Some(path) => config.ca_bundle(path.clone()),
            None => config,
        }
    }

    /// Wrapper options for the production collaborators.
    ///
    /// Resolves `api_key` here so a missing env var is reported as a config
    /// error rather than falling through to netrc.
    pub fn wrapper_options(&self) -> Result<WrapperOptions> {
        let options = WrapperOptions::new()
            .api_config(self.api_config())
            .rendezvous_config(self.rendezvous_config());

        match &self.api_key {
            Some(value) => Ok(options.api_key(value.resolve()?)),
            None => Ok(options),
        }
    }
}

fn deserialize_app_name<'de, D>(deserializer: D) -> std::result::Result<Option<AppName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| AppName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}
