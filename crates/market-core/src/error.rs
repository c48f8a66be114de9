//! Error types for Market Core.

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::transport::TransportError;
use thiserror::Error;

/// Core error type for marketplace operations.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The host already reports the extension as installed.
    #[error("extension is already installed: {0}")]
    AlreadyInstalled(String),

    /// The host does not report the extension as installed.
    #[error("extension is not installed: {0}")]
    NotInstalled(String),

    /// The catalog has no entry for the extension.
    #[error("extension is not known at the marketplace: {0}")]
    UnknownExtension(String),

    /// The catalog knows the extension but no release admits the platform version.
    #[error("no release of '{id}' matches platform version {platform}")]
    NoMatchingRelease {
        /// Extension id.
        id: String,
        /// Platform version the resolution ran against.
        platform: String,
    },

    /// HTTP transport errors
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Cache store errors
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Remote payload is not the expected JSON shape.
    #[error("invalid marketplace payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Platform version string could not be parsed.
    #[error("invalid platform version: {0}")]
    InvalidPlatformVersion(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure reported by the host extension manager.
    #[error("extension host error: {0}")]
    Host(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// Returns true for the errors a bulk update scan treats as "skip this extension".
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::NotInstalled(_) | Self::UnknownExtension(_))
    }
}

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;
