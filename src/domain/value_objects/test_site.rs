use std::fmt;

/// URL probed by the site check and opened in the browser.
///
/// The hostname is extracted once at construction: the scheme is stripped,
/// then everything from the first `/` on. An explicit `:port` is split off
/// the hostname and kept for the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSite {
    url: String,
    https: bool,
    host: String,
    port: u16,
    path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestSiteError {
    #[error("Test site must start with http:// or https://, got: {0}")]
    UnsupportedScheme(String),

    #[error("Test site has no hostname: {0}")]
    MissingHost(String),

    #[error("Test site has an invalid port: {0}")]
    InvalidPort(String),
}

impl TestSite {
    pub fn new(url: impl Into<String>) -> Result<Self, TestSiteError> {
        let url = url.into().trim().to_string();

        let (https, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(TestSiteError::UnsupportedScheme(url));
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let default_port = if https { 443 } else { 80 };
        let (host, port) = split_authority(authority, default_port)
            .ok_or_else(|| TestSiteError::InvalidPort(url.clone()))?;

        if host.is_empty() {
            return Err(TestSiteError::MissingHost(url));
        }

        Ok(Self {
            https,
            host: host.to_string(),
            port,
            path: path.to_string(),
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target in origin form, e.g. `/index.html?q=1`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_https(&self) -> bool {
        self.https
    }

    /// Resolve a redirect `Location` against this URL: absolute URLs replace
    /// it, `//host/..` keeps the scheme, `/path` keeps scheme and authority,
    /// anything else is taken relative to the current directory.
    pub fn follow(&self, location: &str) -> Result<Self, TestSiteError> {
        let location = location.trim();
        let scheme = if self.https { "https" } else { "http" };

        if location.starts_with("https://") || location.starts_with("http://") {
            return Self::new(location);
        }
        if let Some(rest) = location.strip_prefix("//") {
            return Self::new(format!("{}://{}", scheme, rest));
        }

        let origin = format!("{}://{}", scheme, self.host_header());
        if location.starts_with('/') {
            return Self::new(format!("{}{}", origin, location));
        }

        let path = self.path.split(['?', '#']).next().unwrap_or("/");
        let dir = match path.rfind('/') {
            Some(idx) => &path[..=idx],
            None => "/",
        };
        Self::new(format!("{}{}{}", origin, dir, location))
    }

    /// Value for the `Host` header; the port is included only when non-default.
    pub fn host_header(&self) -> String {
        let default_port = if self.https { 443 } else { 80 };
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == default_port {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

impl Default for TestSite {
    fn default() -> Self {
        Self {
            url: "https://redecanais.dev/".to_string(),
            https: true,
            host: "redecanais.dev".to_string(),
            port: 443,
            path: "/".to_string(),
        }
    }
}

impl fmt::Display for TestSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn split_authority(authority: &str, default_port: u16) -> Option<(&str, u16)> {
    // Bracketed IPv6 literal: [::1]:8443
    if let Some(rest) = authority.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        return match &rest[end + 1..] {
            "" => Some((host, default_port)),
            port => Some((host, port.strip_prefix(':')?.parse().ok()?)),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Some((host, port.parse().ok()?)),
        None => Some((authority, default_port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_strips_scheme_and_path() {
        let site = TestSite::new("https://redecanais.dev/").unwrap();
        assert_eq!(site.host(), "redecanais.dev");
        assert_eq!(site.port(), 443);
        assert_eq!(site.path(), "/");
        assert!(site.is_https());

        let site = TestSite::new("https://example.com/a/b?c=d").unwrap();
        assert_eq!(site.host(), "example.com");
        assert_eq!(site.path(), "/a/b?c=d");
    }

    #[test]
    fn test_url_without_path() {
        let site = TestSite::new("http://example.com").unwrap();
        assert_eq!(site.host(), "example.com");
        assert_eq!(site.port(), 80);
        assert_eq!(site.path(), "/");
        assert!(!site.is_https());
    }

    #[test]
    fn test_explicit_ports() {
        let site = TestSite::new("https://example.com:8443/health").unwrap();
        assert_eq!(site.host(), "example.com");
        assert_eq!(site.port(), 8443);
        assert_eq!(site.host_header(), "example.com:8443");

        let site = TestSite::new("https://[2606:4700::1111]:8443/").unwrap();
        assert_eq!(site.host(), "2606:4700::1111");
        assert_eq!(site.port(), 8443);
        assert_eq!(site.host_header(), "[2606:4700::1111]:8443");
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            TestSite::new("ftp://example.com"),
            Err(TestSiteError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            TestSite::new("https:///path"),
            Err(TestSiteError::MissingHost(_))
        ));
        assert!(matches!(
            TestSite::new("https://example.com:http/"),
            Err(TestSiteError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_follow_redirect_locations() {
        let site = TestSite::new("http://localhost:8080/docs/index.html?x=1").unwrap();

        let absolute = site.follow("https://example.com/home").unwrap();
        assert_eq!(absolute.url(), "https://example.com/home");

        let rooted = site.follow("/missing").unwrap();
        assert_eq!(rooted.url(), "http://localhost:8080/missing");
        assert_eq!(rooted.port(), 8080);

        let relative = site.follow("other.html").unwrap();
        assert_eq!(relative.path(), "/docs/other.html");

        let scheme_relative = site.follow("//cdn.example.com/a").unwrap();
        assert_eq!(scheme_relative.url(), "http://cdn.example.com/a");
        assert!(!scheme_relative.is_https());
    }

    #[test]
    fn test_default_matches_parsed() {
        assert_eq!(
            TestSite::default(),
            TestSite::new("https://redecanais.dev/").unwrap()
        );
    }
}
