// ABOUTME: In-memory HerokuApi that records calls and serves canned bodies.
// ABOUTME: Used to exercise the wrapper without a network.

use super::error::ApiError;
use super::types::{AppRecord, DomainRecord, DynoBody, MaintenanceMode, PsOptions, ReleaseRecord};
use super::HerokuApi;
use crate::types::AppName;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// A call received by [`MemoryApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    PostPsRestart {
        app: String,
    },
    PostAppMaintenance {
        app: String,
        flag: &'static str,
    },
    PostPs {
        app: String,
        command: String,
        attach: bool,
    },
    GetDomains {
        app: String,
    },
    GetApp {
        app: String,
    },
    GetReleases {
        app: String,
    },
}

impl ApiCall {
    fn method(&self) -> &'static str {
        match self {
            ApiCall::PostPsRestart { .. }
            | ApiCall::PostAppMaintenance { .. }
            | ApiCall::PostPs { .. } => "POST",
            ApiCall::GetDomains { .. } | ApiCall::GetApp { .. } | ApiCall::GetReleases { .. } => {
                "GET"
            }
        }
    }

    fn path(&self) -> String {
        match self {
            ApiCall::PostPsRestart { app } => format!("/apps/{}/ps/restart", app),
            ApiCall::PostAppMaintenance { app, .. } => format!("/apps/{}/server/maintenance", app),
            ApiCall::PostPs { app, .. } => format!("/apps/{}/ps", app),
            ApiCall::GetDomains { app } => format!("/apps/{}/domains", app),
            ApiCall::GetApp { app } => format!("/apps/{}", app),
            ApiCall::GetReleases { app } => format!("/apps/{}/releases", app),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<ApiCall>,
    ps_body: DynoBody,
    domains: Vec<DomainRecord>,
    app: AppRecord,
    releases: Vec<ReleaseRecord>,
    unavailable: bool,
}

/// Recording API double.
///
/// Clones share the same call log, so a test can keep one handle while the
/// wrapper owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    state: Arc<Mutex<State>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body returned by `post_ps`.
    pub fn with_ps_body(self, body: DynoBody) -> Self {
        self.state.lock().ps_body = body;
        self
    }

    pub fn with_domains(self, domains: Vec<DomainRecord>) -> Self {
        self.state.lock().domains = domains;
        self
    }

    pub fn with_app(self, app: AppRecord) -> Self {
        self.state.lock().app = app;
        self
    }

    pub fn with_releases(self, releases: Vec<ReleaseRecord>) -> Self {
        self.state.lock().releases = releases;
        self
    }

    /// Make every call fail with a 503 status error.
    pub fn unavailable(self) -> Self {
        self.state.lock().unavailable = true;
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let (method, path) = (call.method(), call.path());
        state.calls.push(call);
        if state.unavailable {
            return Err(ApiError::Status {
                method: method.to_string(),
                path,
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HerokuApi for MemoryApi {
    async fn post_ps_restart(&self, app: &AppName) -> Result<(), ApiError> {
        self.record(ApiCall::PostPsRestart {
            app: app.to_string(),
        })
    }

    async fn post_app_maintenance(
        &self,
        app: &AppName,
        mode: MaintenanceMode,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::PostAppMaintenance {
            app: app.to_string(),
            flag: mode.as_flag(),
        })
    }

    async fn post_ps(
        &self,
        app: &AppName,
        command: &str,
        opts: PsOptions,
    ) -> Result<DynoBody, ApiError> {
        self.record(ApiCall::PostPs {
            app: app.to_string(),
            command: command.to_string(),
            attach: opts.attach,
        })?;
        Ok(self.state.lock().ps_body.clone())
    }

    async fn get_domains(&self, app: &AppName) -> Result<Vec<DomainRecord>, ApiError> {
        self.record(ApiCall::GetDomains {
            app: app.to_string(),
        })?;
        Ok(self.state.lock().domains.clone())
    }

    async fn get_app(&self, app: &AppName) -> Result<AppRecord, ApiError> {
        self.record(ApiCall::GetApp {
            app: app.to_string(),
        })?;
        Ok(self.state.lock().app.clone())
    }

    async fn get_releases(&self, app: &AppName) -> Result<Vec<ReleaseRecord>, ApiError> {
        self.record(ApiCall::GetReleases {
            app: app.to_string(),
        })?;
        Ok(self.state.lock().releases.clone())
    }
}
