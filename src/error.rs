// ABOUTME: Application-wide error types for liftoff.
// ABOUTME: Wraps config failures and passes wrapper errors through unchanged.

use crate::wrapper::WrapperError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("no app given (use --app or set `app` in liftoff.yml)")]
    MissingApp,

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Wrapper(#[from] WrapperError),
}

pub type Result<T> = std::result::Result<T, Error>;
