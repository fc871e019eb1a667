use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;

/// Menu keys reserved for the fixed actions; providers cannot use them.
pub const RESERVED_KEYS: [&str; 4] = ["4", "5", "6", "7"];

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider key must not be empty")]
    EmptyKey,

    #[error("Provider key '{0}' is reserved for a menu action")]
    ReservedKey(String),

    #[error("Provider name must not be empty (key '{0}')")]
    EmptyName(String),
}

/// A public resolver: primary/secondary addresses per protocol family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsProvider {
    key: String,
    name: String,
    pub ipv4_primary: Ipv4Addr,
    pub ipv4_secondary: Ipv4Addr,
    pub ipv6_primary: Option<Ipv6Addr>,
    pub ipv6_secondary: Option<Ipv6Addr>,
}

impl DnsProvider {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        ipv4: (Ipv4Addr, Ipv4Addr),
        ipv6: (Option<Ipv6Addr>, Option<Ipv6Addr>),
    ) -> Result<Self, ProviderError> {
        let key = key.into().trim().to_string();
        let name = name.into().trim().to_string();

        if key.is_empty() {
            return Err(ProviderError::EmptyKey);
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ProviderError::ReservedKey(key));
        }
        if name.is_empty() {
            return Err(ProviderError::EmptyName(key));
        }

        Ok(Self {
            key,
            name,
            ipv4_primary: ipv4.0,
            ipv4_secondary: ipv4.1,
            ipv6_primary: ipv6.0,
            ipv6_secondary: ipv6.1,
        })
    }

    pub fn cloudflare() -> Self {
        Self::builtin(
            "1",
            "Cloudflare",
            (Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(1, 0, 0, 1)),
            (
                Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111),
                Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1001),
            ),
        )
    }

    pub fn google() -> Self {
        Self::builtin(
            "2",
            "Google",
            (Ipv4Addr::new(8, 8, 8, 8), Ipv4Addr::new(8, 8, 4, 4)),
            (
                Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888),
                Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8844),
            ),
        )
    }

    pub fn opendns() -> Self {
        Self::builtin(
            "3",
            "OpenDNS",
            (
                Ipv4Addr::new(208, 67, 222, 222),
                Ipv4Addr::new(208, 67, 220, 220),
            ),
            (
                Ipv6Addr::new(0x2620, 0x119, 0x35, 0, 0, 0, 0, 0x35),
                Ipv6Addr::new(0x2620, 0x119, 0x53, 0, 0, 0, 0, 0x53),
            ),
        )
    }

    /// The providers offered when no configuration file overrides them.
    pub fn builtin_set() -> Vec<Self> {
        vec![Self::cloudflare(), Self::google(), Self::opendns()]
    }

    fn builtin(
        key: &str,
        name: &str,
        ipv4: (Ipv4Addr, Ipv4Addr),
        ipv6: (Ipv6Addr, Ipv6Addr),
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            ipv4_primary: ipv4.0,
            ipv4_secondary: ipv4.1,
            ipv6_primary: Some(ipv6.0),
            ipv6_secondary: Some(ipv6.1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Both IPv6 addresses, or `None` when either is missing.
    pub fn ipv6_pair(&self) -> Option<(Ipv6Addr, Ipv6Addr)> {
        self.ipv6_primary.zip(self.ipv6_secondary)
    }
}
