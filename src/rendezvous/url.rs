// ABOUTME: Parsing of rendezvous://host:port/secret URLs.
// ABOUTME: The path without its leading slash is the session secret.

use super::RendezvousError;
use hyper::Uri;
use std::fmt;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendezvousUrl {
    pub host: String,
    pub port: u16,
    pub secret: String,
}

impl RendezvousUrl {
    pub fn parse(url: &str) -> Result<Self, RendezvousError> {
        let invalid = |reason: &str| RendezvousError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|_| invalid("not a URL"))?;

        if uri.scheme_str() != Some("rendezvous") {
            return Err(invalid("scheme must be rendezvous://"));
        }

        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;

        let secret = uri.path().trim_start_matches('/');
        if secret.is_empty() {
            return Err(invalid("missing session secret"));
        }

        Ok(Self {
            host: host.to_string(),
            port: uri.port_u16().unwrap_or(DEFAULT_PORT),
            secret: secret.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Omits the secret so the URL can be logged.
impl fmt::Display for RendezvousUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rendezvous://{}:{}/…", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_port_and_secret() {
        let url = RendezvousUrl::parse("rendezvous://rendezvous.runtime.heroku.com:5000/abc123")
            .unwrap();
        assert_eq!(url.host, "rendezvous.runtime.heroku.com");
        assert_eq!(url.port, 5000);
        assert_eq!(url.secret, "abc123");
        assert_eq!(url.endpoint(), "rendezvous.runtime.heroku.com:5000");
    }

    #[test]
    fn default_port() {
        let url = RendezvousUrl::parse("rendezvous://example.com/s3cret").unwrap();
        assert_eq!(url.port, 5000);
    }

    #[test]
    fn display_hides_secret() {
        let url = RendezvousUrl::parse("rendezvous://example.com:5000/s3cret").unwrap();
        assert!(!url.to_string().contains("s3cret"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            RendezvousUrl::parse("https://example.com/s3cret"),
            Err(RendezvousError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn rejects_missing_secret() {
        assert!(RendezvousUrl::parse("rendezvous://example.com:5000/").is_err());
        assert!(RendezvousUrl::parse("rendezvous://example.com:5000").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(RendezvousUrl::parse("the_url").is_err());
    }
}
