// ABOUTME: Rendezvous capability for attached one-off processes.
// ABOUTME: Blocks until the remote session closes, streaming its output locally.

mod session;
mod url;

pub use session::{RendezvousConfig, TlsRendezvous, stream_session};
pub use url::RendezvousUrl;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendezvousError {
    #[error("invalid rendezvous URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("TLS setup failed: {0}")]
    Tls(#[from] crate::tls::TlsError),

    #[error("no output from remote session for {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Waits for a remote attached session to finish.
#[async_trait]
pub trait Rendezvous: Send + Sync {
    /// Attach to the session at `url` and return once it ends.
    async fn start(&self, url: &str) -> Result<(), RendezvousError>;
}

/// Records every URL it is started with and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct MemoryRendezvous {
    started: Arc<Mutex<Vec<String>>>,
}

impl MemoryRendezvous {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().clone()
    }
}

#[async_trait]
impl Rendezvous for MemoryRendezvous {
    async fn start(&self, url: &str) -> Result<(), RendezvousError> {
        self.started.lock().push(url.to_string());
        Ok(())
    }
}
