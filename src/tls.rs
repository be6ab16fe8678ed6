// ABOUTME: rustls client setup shared by the API client and rendezvous sessions.
// ABOUTME: Loads trust roots from a PEM bundle and opens TLS streams.

use rustls::RootCertStore;
use rustls::pki_types::ServerName;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

/// Well-known CA bundle locations, checked in order.
const SYSTEM_CA_BUNDLES: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt",
    "/etc/pki/tls/certs/ca-bundle.crt",
    "/etc/ssl/ca-bundle.pem",
    "/etc/ssl/cert.pem",
    "/usr/local/etc/openssl/cert.pem",
];

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("no CA bundle found (set SSL_CERT_FILE or ca_bundle)")]
    NoBundle,

    #[error("failed to read CA bundle {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no usable certificates in {0}")]
    NoCertificates(PathBuf),

    #[error("invalid server name: {0}")]
    InvalidServerName(String),
}

/// Locate a CA bundle: `SSL_CERT_FILE` first, then common system paths.
pub fn default_ca_bundle() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SSL_CERT_FILE").map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
    }

    SYSTEM_CA_BUNDLES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Parse a PEM bundle into a root store.
pub fn load_root_store(path: &Path) -> Result<RootCertStore, TlsError> {
    let read_error = |source| TlsError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(certs);
    if ignored > 0 {
        tracing::debug!(path = %path.display(), ignored, "skipped unparsable CA certificates");
    }
    if added == 0 {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }

    Ok(store)
}

/// Build a connector trusting the given bundle, or the system default.
pub fn connector(ca_bundle: Option<&Path>) -> Result<TlsConnector, TlsError> {
    let path = match ca_bundle {
        Some(path) => path.to_path_buf(),
        None => default_ca_bundle().ok_or(TlsError::NoBundle)?,
    };

    let roots = load_root_store(&path)?;
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Perform a TLS handshake over an established TCP stream.
pub async fn handshake(
    connector: &TlsConnector,
    host: &str,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>, std::io::Error> {
    let server_name = ServerName::try_from(host.to_string()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            TlsError::InvalidServerName(host.to_string()),
        )
    })?;
    connector.connect(server_name, stream).await
}
