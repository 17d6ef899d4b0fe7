//! Static configuration.
//!
//! The listen address and the ordered backend list are loaded once at
//! startup from a YAML file and never change afterwards.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default config path when `ROTOR_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "rotor.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,

    /// Ordered backend list; insertion order is the rotation order.
    pub backends: Vec<BackendConfig>,

    #[serde(default)]
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the load balancer listens on (e.g., "127.0.0.1:8000").
    pub listen_addr: String,
}

/// A single upstream entry as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL (scheme + host + port).
    pub url: String,

    /// Optional backend name for logging.
    pub name: Option<String>,
}

/// Forwarder timeouts, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from the path in `ROTOR_CONFIG`, falling back
    /// to `rotor.yaml` in the working directory.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("ROTOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {path}"))?;

        Self::from_yaml(&raw)
    }

    /// Parse configuration from a YAML string and validate every backend
    /// URL. The first malformed URL aborts the whole load.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).context("Invalid config file")?;

        for backend in &cfg.backends {
            url::Url::parse(&backend.url)
                .with_context(|| format!("Malformed backend URL: {}", backend.url))?;
        }

        Ok(cfg)
    }
}
