//! Configuration loading for munind.
//!
//! Configuration is loaded from TOML files with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.munin/config.toml` (user)
//! 3. `/etc/munin/config.toml` (system)
//!
//! The daemon runs fine with no config file at all: the embedded catalog
//! seed and default link bases apply, so every section is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{MuninError, Result};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:9744).
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:9744".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent requests (default: 100).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_max_concurrent() -> usize {
    100
}

fn default_timeout() -> u64 {
    30
}

/// Remote catalog refresh configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Remote catalog URL. Unset disables remote refresh entirely; the
    /// embedded seed is served as-is.
    #[serde(default)]
    pub url: Option<String>,
    /// Refresh interval in seconds (default: 3600).
    #[serde(default)]
    pub refresh_secs: Option<u64>,
    /// Override for the local catalog cache file.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

/// Addressing used in generated links.
#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    /// Public base URL of the browse surface (default: /models).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat surface that `toLLM` links point at (default: https://llm.do).
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_url: default_chat_url(),
        }
    }
}

fn default_base_url() -> String {
    "/models".to_string()
}

fn default_chat_url() -> String {
    "https://llm.do".to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist; otherwise the user and system paths
    /// are tried in order, and defaults apply when neither exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Config::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            MuninError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MuninError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MuninError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".munin").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/munin/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
