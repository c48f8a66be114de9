//! `reqwest` based transport.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::{Transport, TransportError, TransportResult};
use crate::config::MarketConfig;

/// Blocking HTTP transport.
///
/// When an API key is configured, every request carries an
/// `Authorization: apikey: <key>` header.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client.
    client: Client,

    /// Marketplace API key.
    api_key: Option<String>,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout and optional API key.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(timeout: Duration, api_key: Option<String>) -> TransportResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }

    /// Creates a transport from the marketplace configuration.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn from_config(config: &MarketConfig) -> TransportResult<Self> {
        Self::new(config.request_timeout(), config.api_key.clone())
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("apikey: {key}")),
            None => request,
        }
    }

    /// Sends a GET request and rejects non-success statuses.
    fn send(&self, url: &str) -> TransportResult<Response> {
        debug!(url = %url, "GET");
        let response = self.request(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> TransportResult<Vec<u8>> {
        let body = self.send(url)?.bytes()?;
        Ok(body.to_vec())
    }

    fn download(&self, url: &str, destination: &Path) -> TransportResult<u64> {
        let mut response = self.send(url)?;
        let mut file = File::create(destination)?;
        let written = response.copy_to(&mut file)?;
        debug!(url = %url, bytes = written, path = %destination.display(), "Downloaded");
        Ok(written)
    }
}
