// ABOUTME: Typed response bodies for the Heroku legacy API.
// ABOUTME: One structure per operation, decoded from JSON by the HTTP client.

use serde::{Deserialize, Serialize};

/// Maintenance mode toggle, sent on the wire as "1" or "0".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceMode {
    On,
    Off,
}

impl MaintenanceMode {
    pub fn as_flag(&self) -> &'static str {
        match self {
            MaintenanceMode::On => "1",
            MaintenanceMode::Off => "0",
        }
    }
}

impl std::fmt::Display for MaintenanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenanceMode::On => write!(f, "on"),
            MaintenanceMode::Off => write!(f, "off"),
        }
    }
}

/// Options for a one-off process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PsOptions {
    /// Request an attached session, answered with a rendezvous URL.
    pub attach: bool,
}

impl PsOptions {
    pub fn attached() -> Self {
        Self { attach: true }
    }
}

/// Body returned when starting a one-off process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DynoBody {
    Dyno(DynoInfo),
    Text(String),
}

impl Default for DynoBody {
    fn default() -> Self {
        DynoBody::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DynoInfo {
    #[serde(default)]
    pub rendezvous_url: Option<String>,
    #[serde(default)]
    pub process: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub attached: Option<bool>,
}

/// A custom domain attached to the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainRecord {
    pub domain: String,
    #[serde(default)]
    pub base_domain: Option<String>,
}

impl DomainRecord {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            base_domain: None,
        }
    }
}

/// The application record, carrying the platform-assigned hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub domain_name: Option<DomainName>,
}

impl AppRecord {
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain_name: Some(DomainName {
                domain: Some(domain.into()),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainName {
    #[serde(default)]
    pub domain: Option<String>,
}

/// One entry of the release history. The legacy API lists oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub descr: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ReleaseRecord {
    pub fn with_commit(commit: impl Into<String>) -> Self {
        Self {
            commit: Some(commit.into()),
            ..Self::default()
        }
    }
}
