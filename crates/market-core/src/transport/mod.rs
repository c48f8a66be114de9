//! HTTP transport used to reach the marketplace.
//!
//! The catalog layer and the package download both go through [`Transport`],
//! so hosts can swap in their own client (proxy settings, custom TLS) and tests
//! can count requests.

pub mod http;

use std::path::Path;
use thiserror::Error;

pub use http::HttpTransport;

/// Transport errors. Propagated unchanged to callers; never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request error.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Writing the response body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Blocking HTTP GET access to the marketplace.
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the full response body.
    fn get(&self, url: &str) -> TransportResult<Vec<u8>>;

    /// Streams the body of `url` into the file at `destination`.
    ///
    /// Returns the number of bytes written.
    fn download(&self, url: &str, destination: &Path) -> TransportResult<u64>;
}
