//! Site reachability probe: system resolver lookup followed by a GET.

mod https;
mod tls;

use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::TestSite;

pub use https::HttpsSiteProbe;
pub use tls::client_config;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        source: std::io::Error,
    },

    #[error("{0} resolved to no addresses")]
    NoAddresses(String),

    #[error("Invalid TLS server name: {0}")]
    InvalidServerName(String),

    #[error("Failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("Connection failed: {0}")]
    Connect(std::io::Error),

    #[error("TLS handshake failed: {0}")]
    Tls(std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Invalid redirect target: {0}")]
    InvalidRedirect(String),

    #[error("Gave up after {0} redirects")]
    TooManyRedirects(usize),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("TLS configuration error: {0}")]
    TlsConfig(#[from] rustls::Error),

    #[error("Failed to start the probe runtime: {0}")]
    Runtime(std::io::Error),
}

impl ProbeError {
    /// Failures of the request itself (connect, TLS, HTTP, timeout), as
    /// opposed to local setup problems.
    pub fn is_url_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidServerName(_)
                | Self::Connect(_)
                | Self::Tls(_)
                | Self::Http(_)
                | Self::InvalidRedirect(_)
                | Self::TooManyRedirects(_)
                | Self::Timeout(_)
        )
    }
}

pub trait SiteProbe {
    /// Look the site's hostname up through the system resolver.
    fn resolve(&self, site: &TestSite) -> Result<Vec<IpAddr>, ProbeError>;

    /// GET the site from one of `addrs`, following redirects, and return the
    /// final response status.
    fn fetch(&self, site: &TestSite, addrs: &[IpAddr]) -> Result<u16, ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_error_classification() {
        let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert!(ProbeError::Connect(refused).is_url_error());
        assert!(ProbeError::Timeout(Duration::from_secs(10)).is_url_error());

        let runtime = std::io::Error::other("no reactor");
        assert!(!ProbeError::Runtime(runtime).is_url_error());
        assert!(!ProbeError::NoAddresses("example.com".into()).is_url_error());
    }

    #[test]
    fn test_timeout_message() {
        let error = ProbeError::Timeout(Duration::from_secs(10));
        assert_eq!(error.to_string(), "No response within 10s");
    }
}
