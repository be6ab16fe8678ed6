// ABOUTME: API error types with SNAFU pattern.
// ABOUTME: Separates transport, status and decoding failures for programmatic handling.

use snafu::Snafu;

/// Error returned by a Heroku API call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("failed to connect to {endpoint}: {source}"))]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    #[snafu(display("TLS setup failed: {source}"))]
    TlsSetup { source: crate::tls::TlsError },

    #[snafu(display("TLS handshake with {host} failed: {source}"))]
    TlsHandshake {
        host: String,
        source: std::io::Error,
    },

    #[snafu(display("HTTP exchange failed: {source}"))]
    Http { source: hyper::Error },

    #[snafu(display("invalid request: {message}"))]
    InvalidRequest { message: String },

    #[snafu(display("{method} {path} returned {status}: {body}"))]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[snafu(display("unexpected response body from {operation}: {source}"))]
    UnexpectedResponse {
        operation: &'static str,
        source: serde_json::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Could not reach the API (TCP, TLS or HTTP framing).
    Connection,
    /// API key rejected.
    Unauthorized,
    /// App or resource does not exist.
    NotFound,
    /// API returned a 5xx.
    Server,
    /// Any other non-success status.
    Rejected,
    /// Body did not match the expected shape.
    UnexpectedResponse,
    /// Request could not be built.
    InvalidRequest,
}

impl ApiError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Connect { .. }
            | ApiError::TlsSetup { .. }
            | ApiError::TlsHandshake { .. }
            | ApiError::Http { .. } => ApiErrorKind::Connection,
            ApiError::InvalidRequest { .. } => ApiErrorKind::InvalidRequest,
            ApiError::Status { status, .. } => match status {
                401 | 403 => ApiErrorKind::Unauthorized,
                404 => ApiErrorKind::NotFound,
                500..=599 => ApiErrorKind::Server,
                _ => ApiErrorKind::Rejected,
            },
            ApiError::UnexpectedResponse { .. } => ApiErrorKind::UnexpectedResponse,
        }
    }

    /// Returns the HTTP status if the API answered with a failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
