// ABOUTME: hyper-based HerokuApi implementation for the legacy v2 endpoints.
// ABOUTME: One HTTP/1 connection per call, TLS via rustls for https base URLs.

use super::error::{
    ConnectSnafu, HttpSnafu, StatusSnafu, TlsHandshakeSnafu, TlsSetupSnafu,
    UnexpectedResponseSnafu,
};
use super::types::{AppRecord, DomainRecord, DynoBody, MaintenanceMode, PsOptions, ReleaseRecord};
use super::{ApiError, HerokuApi};
use crate::tls;
use crate::types::AppName;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, HOST, USER_AGENT};
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

pub const DEFAULT_API_URL: &str = "https://api.heroku.com";

/// Connection settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API (default: https://api.heroku.com).
    pub base_url: String,
    /// PEM bundle of trusted roots. If None, the system bundle is used.
    pub ca_bundle: Option<PathBuf>,
    /// Value of the User-Agent header.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            ca_bundle: None,
            user_agent: concat!("liftoff/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// Heroku API client speaking HTTP/1.1 directly over hyper.
pub struct HttpHerokuApi {
    host: String,
    port: u16,
    host_header: String,
    base_path: String,
    tls: Option<TlsConnector>,
    authorization: String,
    user_agent: String,
}

impl std::fmt::Debug for HttpHerokuApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpHerokuApi")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpHerokuApi {
    /// Create a client authenticating with `api_key`.
    pub fn new(api_key: &str, config: &ApiConfig) -> Result<Self, ApiError> {
        let uri: Uri = config.base_url.parse().map_err(|e| ApiError::InvalidRequest {
            message: format!("invalid API URL {}: {}", config.base_url, e),
        })?;

        let host = uri
            .host()
            .ok_or_else(|| ApiError::InvalidRequest {
                message: format!("API URL has no host: {}", config.base_url),
            })?
            .to_string();

        let (tls, default_port) = match uri.scheme_str() {
            Some("https") => (
                Some(tls::connector(config.ca_bundle.as_deref()).context(TlsSetupSnafu)?),
                443,
            ),
            Some("http") => (None, 80),
            other => {
                return Err(ApiError::InvalidRequest {
                    message: format!("unsupported API URL scheme: {:?}", other),
                });
            }
        };

        let port = uri.port_u16().unwrap_or(default_port);
        let host_header = if port == default_port {
            host.clone()
        } else {
            format!("{}:{}", host, port)
        };

        Ok(Self {
            host,
            port,
            host_header,
            base_path: uri.path().trim_end_matches('/').to_string(),
            tls,
            authorization: basic_auth(api_key),
            user_agent: config.user_agent.clone(),
        })
    }

    fn app_path(&self, app: &AppName, suffix: &str) -> String {
        format!(
            "{}/apps/{}{}",
            self.base_path,
            urlencoding::encode(app.as_str()),
            suffix
        )
    }

    /// Send a request and return the body of a successful response.
    async fn request(&self, method: Method, path: String) -> Result<Bytes, ApiError> {
        tracing::debug!(%method, %path, host = %self.host, "heroku API request");

        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .context(ConnectSnafu {
                endpoint: format!("{}:{}", self.host, self.port),
            })?;

        match &self.tls {
            Some(connector) => {
                let stream = tls::handshake(connector, &self.host, tcp)
                    .await
                    .context(TlsHandshakeSnafu {
                        host: self.host.clone(),
                    })?;
                self.exchange(TokioIo::new(stream), method, path).await
            }
            None => self.exchange(TokioIo::new(tcp), method, path).await,
        }
    }

    async fn exchange<T>(
        &self,
        io: TokioIo<T>,
        method: Method,
        path: String,
    ) -> Result<Bytes, ApiError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .context(HttpSnafu)?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("heroku API connection error: {}", e);
            }
        });

        let req = Request::builder()
            .method(method.clone())
            .uri(&path)
            .header(HOST, &self.host_header)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_LENGTH, "0")
            .body(Empty::<Bytes>::new())
            .map_err(|e| ApiError::InvalidRequest {
                message: format!("failed to build request: {}", e),
            })?;

        let resp = sender.send_request(req).await.context(HttpSnafu)?;
        let status = resp.status();
        let body = resp.into_body().collect().await.context(HttpSnafu)?.to_bytes();

        if !status.is_success() {
            return StatusSnafu {
                method: method.to_string(),
                path,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }
            .fail();
        }

        Ok(body)
    }
}

fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{}", api_key)))
}

/// Dyno JSON when it decodes, otherwise the body as plain text.
fn dyno_body(body: &[u8]) -> DynoBody {
    match serde_json::from_slice::<DynoBody>(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "post_ps body is not dyno JSON, keeping it as text");
            DynoBody::Text(String::from_utf8_lossy(body).into_owned())
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).context(UnexpectedResponseSnafu { operation })
}

#[async_trait]
impl HerokuApi for HttpHerokuApi {
    async fn post_ps_restart(&self, app: &AppName) -> Result<(), ApiError> {
        let path = self.app_path(app, "/ps/restart");
        self.request(Method::POST, path).await?;
        Ok(())
    }

    async fn post_app_maintenance(
        &self,
        app: &AppName,
        mode: MaintenanceMode,
    ) -> Result<(), ApiError> {
        let path = self.app_path(
            app,
            &format!("/server/maintenance?maintenance_mode={}", mode.as_flag()),
        );
        self.request(Method::POST, path).await?;
        Ok(())
    }

    async fn post_ps(
        &self,
        app: &AppName,
        command: &str,
        opts: PsOptions,
    ) -> Result<DynoBody, ApiError> {
        let path = self.app_path(
            app,
            &format!(
                "/ps?command={}&attach={}",
                urlencoding::encode(command),
                opts.attach
            ),
        );
        let body = self.request(Method::POST, path).await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(DynoBody::default());
        }
        Ok(dyno_body(&body))
    }

    async fn get_domains(&self, app: &AppName) -> Result<Vec<DomainRecord>, ApiError> {
        let body = self.request(Method::GET, self.app_path(app, "/domains")).await?;
        decode("get_domains", &body)
    }

    async fn get_app(&self, app: &AppName) -> Result<AppRecord, ApiError> {
        let body = self.request(Method::GET, self.app_path(app, "")).await?;
        decode("get_app", &body)
    }

    async fn get_releases(&self, app: &AppName) -> Result<Vec<ReleaseRecord>, ApiError> {
        let body = self.request(Method::GET, self.app_path(app, "/releases")).await?;
        decode("get_releases", &body)
    }
}
