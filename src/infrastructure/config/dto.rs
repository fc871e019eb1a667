//! On-disk TOML layout.
//!
//! Every field is optional so a partial file only overrides what it names.
//! Conversion into `Config` is where addresses, names and durations are
//! validated, so nothing downstream sees an unchecked value.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::{Config, ConfigError};
use crate::domain::{DnsProvider, InterfaceTarget, TestSite};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDto {
    pub interface: Option<String>,
    pub test_site: Option<String>,
    pub ipv4_ping_host: Option<String>,
    pub ipv6_ping_host: Option<String>,
    pub insecure_tls: Option<bool>,
    /// humantime syntax, e.g. `"10s"`
    pub http_timeout: Option<String>,
    /// humantime syntax, e.g. `"1s"` or `"500ms"`
    pub command_pause: Option<String>,
    pub log_file: Option<PathBuf>,
    pub providers: Option<Vec<ProviderDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderDto {
    pub key: String,
    pub name: String,
    pub ipv4: Vec<Ipv4Addr>,
    #[serde(default)]
    pub ipv6: Vec<Ipv6Addr>,
}

impl TryFrom<ProviderDto> for DnsProvider {
    type Error = ConfigError;

    fn try_from(dto: ProviderDto) -> Result<Self, Self::Error> {
        let ipv4 = match dto.ipv4.as_slice() {
            [primary, secondary] => (*primary, *secondary),
            other => {
                return Err(ConfigError::InvalidAddresses {
                    key: dto.key,
                    reason: format!("expected 2 IPv4 addresses, got {}", other.len()),
                });
            }
        };

        let ipv6 = match dto.ipv6.as_slice() {
            [] => (None, None),
            [primary] => (Some(*primary), None),
            [primary, secondary] => (Some(*primary), Some(*secondary)),
            other => {
                return Err(ConfigError::InvalidAddresses {
                    key: dto.key,
                    reason: format!("expected at most 2 IPv6 addresses, got {}", other.len()),
                });
            }
        };

        Ok(DnsProvider::new(dto.key, dto.name, ipv4, ipv6)?)
    }
}

impl TryFrom<ConfigDto> for Config {
    type Error = ConfigError;

    fn try_from(dto: ConfigDto) -> Result<Self, Self::Error> {
        let defaults = Config::default();

        let interface = match dto.interface {
            Some(name) => InterfaceTarget::new(name)?,
            None => defaults.interface,
        };

        let test_site = match dto.test_site {
            Some(url) => TestSite::new(url)?,
            None => defaults.test_site,
        };

        let providers = match dto.providers {
            Some(list) => convert_providers(list)?,
            None => defaults.providers,
        };

        Ok(Config {
            interface,
            providers,
            test_site,
            ipv4_ping_host: dto.ipv4_ping_host.unwrap_or(defaults.ipv4_ping_host),
            ipv6_ping_host: dto.ipv6_ping_host.unwrap_or(defaults.ipv6_ping_host),
            insecure_tls: dto.insecure_tls.unwrap_or(defaults.insecure_tls),
            http_timeout: parse_duration("http_timeout", dto.http_timeout)?
                .unwrap_or(defaults.http_timeout),
            command_pause: parse_duration("command_pause", dto.command_pause)?
                .unwrap_or(defaults.command_pause),
            log_file: dto.log_file,
        })
    }
}

fn convert_providers(list: Vec<ProviderDto>) -> Result<Vec<DnsProvider>, ConfigError> {
    if list.is_empty() {
        return Err(ConfigError::NoProviders);
    }

    let mut seen = HashSet::new();
    let mut providers = Vec::with_capacity(list.len());
    for dto in list {
        let provider = DnsProvider::try_from(dto)?;
        if !seen.insert(provider.key().to_string()) {
            return Err(ConfigError::DuplicateKey(provider.key().to_string()));
        }
        providers.push(provider);
    }
    Ok(providers)
}

fn parse_duration(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|v| {
            humantime::parse_duration(&v)
                .map_err(|e| ConfigError::InvalidDuration { field, source: e })
        })
        .transpose()
}
