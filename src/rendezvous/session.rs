// ABOUTME: TLS rendezvous client that relays a remote session to stdout.
// ABOUTME: Sends the secret, drops the greeting, and reads until the server closes.

use super::url::RendezvousUrl;
use super::{Rendezvous, RendezvousError};
use crate::tls;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Line the server sends once the secret is accepted.
const GREETING: &[u8] = b"rendezvous\r\n";

/// Settings for rendezvous sessions.
#[derive(Debug, Clone)]
pub struct RendezvousConfig {
    /// Give up if the session stays silent this long (default: 1 hour).
    pub activity_timeout: Duration,
    /// PEM bundle of trusted roots. If None, the system bundle is used.
    pub ca_bundle: Option<PathBuf>,
}

impl Default for RendezvousConfig {
    fn default() -> Self {
        Self {
            activity_timeout: Duration::from_secs(3600),
            ca_bundle: None,
        }
    }
}

impl RendezvousConfig {
    pub fn activity_timeout(mut self, timeout: Duration) -> Self {
        self.activity_timeout = timeout;
        self
    }

    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }
}

/// Rendezvous over TLS, relaying session output to stdout.
#[derive(Debug, Clone, Default)]
pub struct TlsRendezvous {
    config: RendezvousConfig,
}

impl TlsRendezvous {
    pub fn new(config: RendezvousConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Rendezvous for TlsRendezvous {
    async fn start(&self, url: &str) -> Result<(), RendezvousError> {
        let target = RendezvousUrl::parse(url)?;
        tracing::info!(%target, "attaching to remote session");

        let connector = tls::connector(self.config.ca_bundle.as_deref())?;
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(|source| RendezvousError::Connect {
                endpoint: target.endpoint(),
                source,
            })?;
        let stream = tls::handshake(&connector, &target.host, tcp).await?;

        let mut stdout = tokio::io::stdout();
        let relayed = stream_session(
            stream,
            &target.secret,
            &mut stdout,
            self.config.activity_timeout,
        )
        .await?;

        tracing::info!(%target, bytes = relayed, "remote session ended");
        Ok(())
    }
}

/// Run one rendezvous exchange over `stream`, copying output to `output`.
///
/// Returns the number of bytes written to `output`. Fails with
/// [`RendezvousError::Timeout`] if a single read waits longer than
/// `activity_timeout`.
pub async fn stream_session<S, W>(
    mut stream: S,
    secret: &str,
    output: &mut W,
    activity_timeout: Duration,
) -> Result<u64, RendezvousError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    stream.write_all(secret.as_bytes()).await?;
    stream.write_all(b"\r\n").await?;
    stream.flush().await?;

    let mut buf = vec![0u8; 8192];
    // Bytes held back while they could still be the start of the greeting.
    let mut head: Option<Vec<u8>> = Some(Vec::new());
    let mut written = 0u64;

    loop {
        let n = tokio::time::timeout(activity_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| RendezvousError::Timeout(activity_timeout))??;
        if n == 0 {
            break;
        }

        let chunk = &buf[..n];
        let Some(mut pending) = head.take() else {
            output.write_all(chunk).await?;
            written += n as u64;
            continue;
        };

        pending.extend_from_slice(chunk);
        if pending.len() < GREETING.len() && GREETING.starts_with(&pending) {
            head = Some(pending);
            continue;
        }

        let data = pending.strip_prefix(GREETING).unwrap_or(&pending);
        output.write_all(data).await?;
        written += data.len() as u64;
    }

    if let Some(pending) = head.filter(|p| !p.is_empty()) {
        output.write_all(&pending).await?;
        written += pending.len() as u64;
    }

    output.flush().await?;
    Ok(written)
}
