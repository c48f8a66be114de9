//! Configuration module for Market Core.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`MarketConfig::store_url`].
pub const ENV_STORE_URL: &str = "MARKET_STORE_URL";
/// Environment variable overriding [`MarketConfig::api_key`].
pub const ENV_API_KEY: &str = "MARKET_API_KEY";
/// Environment variable overriding [`MarketConfig::cache_ttl_secs`].
pub const ENV_CACHE_TTL_SECS: &str = "MARKET_CACHE_TTL_SECS";

/// Marketplace client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketConfig {
    /// Marketplace origin, without the `/api/v1` suffix.
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Optional API key, sent as `Authorization: apikey: <key>`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Seconds a catalog or category response stays cached (default: 86400 = 24 hours).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for downloaded packages. Uses the system temp dir when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_store_url() -> String {
    "https://marketplace.owncloud.com".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60 * 24
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            download_dir: None,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl MarketConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default file (if present) and the environment.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or the result is invalid
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_path();
        let config = if path.exists() { Self::load_from_file(&path)? } else { Self::default() };
        config.apply_env()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or the result is invalid
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let config: Self = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `MARKET_*` environment variables on top of this configuration.
    ///
    /// # Errors
    /// Returns error if a variable holds an invalid value
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(url) = lookup(ENV_STORE_URL) {
            self.store_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = ttl.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{ENV_CACHE_TTL_SECS} is not a number: {ttl}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `InvalidValue` for a non-http store URL or a zero TTL or timeout
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.store_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue("store_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "store_url must be an http(s) URL: {}",
                url
            )));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Store URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.store_url.trim().trim_end_matches('/')
    }

    /// Get the cache TTL as a Duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get default configuration file path.
    pub fn default_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".market")
            .join("config.toml")
    }
}
