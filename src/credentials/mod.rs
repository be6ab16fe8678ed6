// ABOUTME: API key resolution from the environment or a local netrc file.
// ABOUTME: Defines the KeyExtractor capability and its local and static implementations.

mod netrc;

pub use netrc::{Machine, Netrc, NetrcError};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable checked before the netrc file.
pub const API_KEY_ENV: &str = "HEROKU_API_KEY";

/// netrc machine holding the API key.
pub const API_HOST: &str = "api.heroku.com";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("no Heroku API key found (set HEROKU_API_KEY or add api.heroku.com to {0})")]
    NotFound(PathBuf),

    #[error("resolved API key is empty")]
    Empty,

    #[error("no home directory to locate .netrc")]
    NoHomeDir,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed netrc file {path}: {source}")]
    Netrc { path: PathBuf, source: NetrcError },
}

/// Produces the API key used to authenticate.
pub trait KeyExtractor: Send + Sync {
    fn get_credentials(&self) -> Result<String, CredentialsError>;
}

/// Reads `HEROKU_API_KEY`, then the `api.heroku.com` entry of `~/.netrc`.
#[derive(Debug, Clone)]
pub struct LocalKeyExtractor {
    env_var: String,
    netrc_path: Option<PathBuf>,
}

impl Default for LocalKeyExtractor {
    fn default() -> Self {
        Self {
            env_var: API_KEY_ENV.to_string(),
            netrc_path: None,
        }
    }
}

impl LocalKeyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn netrc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.netrc_path = Some(path.into());
        self
    }

    fn resolve_netrc_path(&self) -> Result<PathBuf, CredentialsError> {
        match &self.netrc_path {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".netrc"))
                .ok_or(CredentialsError::NoHomeDir),
        }
    }
}

impl KeyExtractor for LocalKeyExtractor {
    fn get_credentials(&self) -> Result<String, CredentialsError> {
        if let Ok(key) = std::env::var(&self.env_var) {
            if !key.trim().is_empty() {
                tracing::debug!(var = %self.env_var, "using API key from environment");
                return Ok(key.trim().to_string());
            }
        }

        let path = self.resolve_netrc_path()?;
        read_netrc_password(&path)?.ok_or(CredentialsError::NotFound(path))
    }
}

fn read_netrc_password(path: &Path) -> Result<Option<String>, CredentialsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CredentialsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let netrc = Netrc::parse(&content).map_err(|source| CredentialsError::Netrc {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "reading API key from netrc");
    Ok(netrc
        .machine(API_HOST)
        .and_then(|m| m.password.clone())
        .filter(|p| !p.trim().is_empty()))
}

/// Always returns the same key.
#[derive(Debug, Clone)]
pub struct StaticKeyExtractor {
    key: String,
}

impl StaticKeyExtractor {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl KeyExtractor for StaticKeyExtractor {
    fn get_credentials(&self) -> Result<String, CredentialsError> {
        Ok(self.key.clone())
    }
}
