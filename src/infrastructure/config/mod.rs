mod dto;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::{
    DnsProvider, InterfaceTarget, InterfaceTargetError, ProviderError, TestSite, TestSiteError,
};

pub use dto::{ConfigDto, ProviderDto};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "DNS_SWITCH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid interface: {0}")]
    Interface(#[from] InterfaceTargetError),

    #[error("Invalid test site: {0}")]
    TestSite(#[from] TestSiteError),

    #[error("Invalid provider: {0}")]
    Provider(#[from] ProviderError),

    #[error("Provider '{key}' has invalid addresses: {reason}")]
    InvalidAddresses { key: String, reason: String },

    #[error("Provider key defined more than once: {0}")]
    DuplicateKey(String),

    #[error("At least one DNS provider must be configured")]
    NoProviders,

    #[error("Invalid duration for {field}: {source}")]
    InvalidDuration {
        field: &'static str,
        source: humantime::DurationError,
    },
}

/// Everything the controller and menu need, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub interface: InterfaceTarget,
    pub providers: Vec<DnsProvider>,
    pub test_site: TestSite,
    pub ipv4_ping_host: String,
    pub ipv6_ping_host: String,
    /// Accept any certificate and hostname in the site probe. The probe only
    /// checks reachability.
    pub insecure_tls: bool,
    pub http_timeout: Duration,
    /// Pause after each configuration command.
    pub command_pause: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn provider(&self, key: &str) -> Option<&DnsProvider> {
        self.providers.iter().find(|p| p.key() == key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: InterfaceTarget::default(),
            providers: DnsProvider::builtin_set(),
            test_site: TestSite::default(),
            ipv4_ping_host: "google.com".to_string(),
            ipv6_ping_host: "ipv6.google.com".to_string(),
            insecure_tls: true,
            http_timeout: Duration::from_secs(10),
            command_pause: Duration::from_secs(1),
            log_file: None,
        }
    }
}

pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Explicit path, else `DNS_SWITCH_CONFIG`, else the per-user config dir.
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        let path = explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(Self::default_path);
        Self::new(path)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dns-switch").join("config.toml"))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// A missing file yields the built-in defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(Config::default());
        };
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let dto: ConfigDto = toml::from_str(content)?;
        Config::try_from(dto)
    }
}
