// ABOUTME: Heroku API capability trait and its implementations.
// ABOUTME: HttpHerokuApi talks to the real service, MemoryApi records calls for tests.

mod error;
mod http;
mod memory;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::{ApiConfig, DEFAULT_API_URL, HttpHerokuApi};
pub use memory::{ApiCall, MemoryApi};
pub use types::{
    AppRecord, DomainName, DomainRecord, DynoBody, DynoInfo, MaintenanceMode, PsOptions,
    ReleaseRecord,
};

use crate::types::AppName;
use async_trait::async_trait;

/// Remote operations against a single application.
///
/// Each method maps to one legacy API endpoint. Implementations return the
/// decoded body and leave interpretation to the caller.
#[async_trait]
pub trait HerokuApi: Send + Sync {
    /// Restart every process of the app.
    async fn post_ps_restart(&self, app: &AppName) -> Result<(), ApiError>;

    /// Enable or disable maintenance mode.
    async fn post_app_maintenance(
        &self,
        app: &AppName,
        mode: MaintenanceMode,
    ) -> Result<(), ApiError>;

    /// Start a one-off process running `command`.
    async fn post_ps(
        &self,
        app: &AppName,
        command: &str,
        opts: PsOptions,
    ) -> Result<DynoBody, ApiError>;

    /// List custom domains.
    async fn get_domains(&self, app: &AppName) -> Result<Vec<DomainRecord>, ApiError>;

    /// Fetch the app record.
    async fn get_app(&self, app: &AppName) -> Result<AppRecord, ApiError>;

    /// List releases, oldest first.
    async fn get_releases(&self, app: &AppName) -> Result<Vec<ReleaseRecord>, ApiError>;
}
