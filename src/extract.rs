// ABOUTME: Pure functions pulling scalar values out of typed API bodies.
// ABOUTME: Missing required fields fail with a fixed ExtractError instead of panicking.

use crate::api::{AppRecord, DomainRecord, DynoBody, ReleaseRecord};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("response is missing field {0}")]
    MissingField(&'static str),
}

/// Rendezvous URL of an attached one-off process, if the API returned one.
pub fn rendezvous_url(body: &DynoBody) -> Option<&str> {
    match body {
        DynoBody::Dyno(info) => info
            .rendezvous_url
            .as_deref()
            .filter(|url| !url.trim().is_empty()),
        DynoBody::Text(_) => None,
    }
}

/// First custom domain, if any are configured.
pub fn custom_domain(domains: &[DomainRecord]) -> Option<&str> {
    domains.first().map(|d| d.domain.as_str())
}

/// Platform-assigned hostname from the app record.
pub fn default_domain(app: &AppRecord) -> Result<&str, ExtractError> {
    app.domain_name
        .as_ref()
        .and_then(|d| d.domain.as_deref())
        .filter(|d| !d.trim().is_empty())
        .ok_or(ExtractError::MissingField("domain_name.domain"))
}

/// Commit of the most recent release.
pub fn last_commit(releases: &[ReleaseRecord]) -> Option<&str> {
    releases.last().and_then(|r| r.commit.as_deref())
}
