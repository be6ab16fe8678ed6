// ABOUTME: HerokuWrapper turns deployment actions into Heroku API calls.
// ABOUTME: Collaborators are injected through WrapperOptions; API errors pass through untouched.

use crate::api::{ApiConfig, ApiError, HerokuApi, HttpHerokuApi, MaintenanceMode, PsOptions};
use crate::credentials::{CredentialsError, KeyExtractor, LocalKeyExtractor};
use crate::extract::{self, ExtractError};
use crate::rendezvous::{Rendezvous, RendezvousConfig, RendezvousError, TlsRendezvous};
use crate::types::AppName;
use std::sync::Arc;
use thiserror::Error;

/// One-off command run by [`HerokuWrapper::run_migrations`].
pub const MIGRATION_COMMAND: &str = "rake db:migrate";

#[derive(Debug, Error)]
pub enum WrapperError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Rendezvous(#[from] RendezvousError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Construction options for [`HerokuWrapper`].
///
/// Every collaborator is optional. Missing ones fall back to the production
/// implementation: `LocalKeyExtractor`, `TlsRendezvous` and `HttpHerokuApi`.
#[derive(Clone, Default)]
pub struct WrapperOptions {
    api_key: Option<String>,
    api: Option<Arc<dyn HerokuApi>>,
    key_extractor: Option<Arc<dyn KeyExtractor>>,
    rendezvous: Option<Arc<dyn Rendezvous>>,
    api_config: ApiConfig,
    rendezvous_config: RendezvousConfig,
}

impl std::fmt::Debug for WrapperOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api", &self.api.is_some())
            .field("key_extractor", &self.key_extractor.is_some())
            .field("rendezvous", &self.rendezvous.is_some())
            .field("api_config", &self.api_config)
            .field("rendezvous_config", &self.rendezvous_config)
            .finish()
    }
}

impl WrapperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit API key; the key extractor is then never consulted.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api(mut self, api: impl HerokuApi + 'static) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    pub fn key_extractor(mut self, extractor: impl KeyExtractor + 'static) -> Self {
        self.key_extractor = Some(Arc::new(extractor));
        self
    }

    pub fn rendezvous(mut self, rendezvous: impl Rendezvous + 'static) -> Self {
        self.rendezvous = Some(Arc::new(rendezvous));
        self
    }

    /// Settings for the default HTTP client. Ignored when `api` is set.
    pub fn api_config(mut self, config: ApiConfig) -> Self {
        self.api_config = config;
        self
    }

    /// Settings for the default rendezvous client. Ignored when `rendezvous` is set.
    pub fn rendezvous_config(mut self, config: RendezvousConfig) -> Self {
        self.rendezvous_config = config;
        self
    }
}

/// Deployment actions against a single Heroku application.
pub struct HerokuWrapper {
    app_name: AppName,
    api_key: Option<String>,
    api: Arc<dyn HerokuApi>,
    key_extractor: Arc<dyn KeyExtractor>,
    rendezvous: Arc<dyn Rendezvous>,
}

impl std::fmt::Debug for HerokuWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HerokuWrapper")
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

impl HerokuWrapper {
    /// Build a wrapper for `app_name`.
    ///
    /// Without an injected API client this resolves the API key up front and
    /// fails if it is missing or blank.
    pub fn new(app_name: AppName, options: WrapperOptions) -> Result<Self, WrapperError> {
        let WrapperOptions {
            api_key,
            api,
            key_extractor,
            rendezvous,
            api_config,
            rendezvous_config,
        } = options;

        let key_extractor: Arc<dyn KeyExtractor> = match key_extractor {
            Some(extractor) => extractor,
            None => Arc::new(LocalKeyExtractor::default()),
        };

        let rendezvous: Arc<dyn Rendezvous> = match rendezvous {
            Some(rendezvous) => rendezvous,
            None => Arc::new(TlsRendezvous::new(rendezvous_config)),
        };

        let api: Arc<dyn HerokuApi> = match api {
            Some(api) => api,
            None => {
                let key = resolve_key(api_key.as_deref(), key_extractor.as_ref())?;
                if key.trim().is_empty() {
                    return Err(CredentialsError::Empty.into());
                }
                Arc::new(HttpHerokuApi::new(&key, &api_config)?)
            }
        };

        Ok(Self {
            app_name,
            api_key,
            api,
            key_extractor,
            rendezvous,
        })
    }

    pub fn app_name(&self) -> &AppName {
        &self.app_name
    }

    /// The explicit key if one was given, otherwise the key extractor's answer.
    pub fn api_key(&self) -> Result<String, WrapperError> {
        Ok(resolve_key(
            self.api_key.as_deref(),
            self.key_extractor.as_ref(),
        )?)
    }

    pub async fn app_restart(&self) -> Result<(), WrapperError> {
        tracing::info!(app = %self.app_name, "restarting app");
        self.api.post_ps_restart(&self.app_name).await?;
        Ok(())
    }

    pub async fn app_maintenance_on(&self) -> Result<(), WrapperError> {
        self.set_maintenance(MaintenanceMode::On).await
    }

    pub async fn app_maintenance_off(&self) -> Result<(), WrapperError> {
        self.set_maintenance(MaintenanceMode::Off).await
    }

    async fn set_maintenance(&self, mode: MaintenanceMode) -> Result<(), WrapperError> {
        tracing::info!(app = %self.app_name, %mode, "setting maintenance mode");
        self.api.post_app_maintenance(&self.app_name, mode).await?;
        Ok(())
    }

    /// Run `rake db:migrate` and wait for the session to finish.
    pub async fn run_migrations(&self) -> Result<(), WrapperError> {
        let body = self.run_attached(MIGRATION_COMMAND).await?;

        if let Some(url) = extract::rendezvous_url(&body) {
            tracing::info!(app = %self.app_name, "waiting for migrations to finish");
            self.rendezvous.start(url).await?;
        }

        Ok(())
    }

    /// Start `task` as an attached one-off process without waiting on it.
    pub async fn run_task(&self, task: &str) -> Result<(), WrapperError> {
        let body = self.run_attached(task).await?;

        if extract::rendezvous_url(&body).is_some() {
            tracing::debug!(app = %self.app_name, "task session opened, not waiting for it");
        }

        Ok(())
    }

    async fn run_attached(&self, command: &str) -> Result<crate::api::DynoBody, WrapperError> {
        tracing::info!(app = %self.app_name, command, "running one-off process");
        Ok(self
            .api
            .post_ps(&self.app_name, command, PsOptions::attached())
            .await?)
    }

    /// First custom domain, or the platform hostname when there is none.
    pub async fn app_url(&self) -> Result<String, WrapperError> {
        let domains = self.api.get_domains(&self.app_name).await?;
        if let Some(domain) = extract::custom_domain(&domains) {
            return Ok(domain.to_string());
        }

        tracing::debug!(app = %self.app_name, "no custom domains, using default app domain");
        let app = self.api.get_app(&self.app_name).await?;
        Ok(extract::default_domain(&app)?.to_string())
    }

    /// Commit of the latest release, or None before the first deploy.
    pub async fn last_deploy_commit(&self) -> Result<Option<String>, WrapperError> {
        let releases = self.api.get_releases(&self.app_name).await?;
        Ok(extract::last_commit(&releases).map(str::to_string))
    }
}

fn resolve_key(
    api_key: Option<&str>,
    extractor: &dyn KeyExtractor,
) -> Result<String, CredentialsError> {
    match api_key {
        Some(key) => Ok(key.to_string()),
        None => extractor.get_credentials(),
    }
}
