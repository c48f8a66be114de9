//! Catalog and category fetching behind a TTL cache.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::Catalog;
use crate::cache::CacheStore;
use crate::config::MarketConfig;
use crate::error::Result;
use crate::platform::PlatformVersion;
use crate::transport::Transport;
use crate::version::VersionComparator;

/// Reference version that caps catalog keys at three components.
const KEY_REFERENCE_VERSION: &str = "1.2.3";

/// Cache key of the category list.
pub const CATEGORIES_KEY: &str = "categories";

/// Fetches the catalog and category list, caching responses in a [`CacheStore`].
///
/// Every query checks `is_available()` on the store exactly once. A fresh
/// cached payload is returned without touching the network; there is no
/// revalidation against the server before the TTL runs out.
pub struct CatalogCache {
    store_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CatalogCache {
    /// Creates a catalog cache for the marketplace at `store_url`.
    pub fn new(
        store_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        let store_url = store_url.into().trim_end_matches('/').to_string();
        Self { store_url, transport, store, ttl }
    }

    /// Creates a catalog cache using the store URL and TTL from `config`.
    pub fn from_config(
        config: &MarketConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self::new(config.base_url(), transport, store, config.cache_ttl())
    }

    /// The platform version as used in catalog keys and URLs: at most three components.
    pub fn catalog_version(platform: &PlatformVersion) -> String {
        VersionComparator::normalize(&platform.to_string(), KEY_REFERENCE_VERSION).0
    }

    /// Cache key of the catalog for `platform`, e.g. `apps_10.0.3`.
    pub fn catalog_key(platform: &PlatformVersion) -> String {
        format!("apps_{}", Self::catalog_version(platform))
    }

    /// URL of the catalog for `platform`.
    pub fn catalog_url(&self, platform: &PlatformVersion) -> String {
        format!("{}/api/v1/platform/{}/apps.json", self.store_url, Self::catalog_version(platform))
    }

    /// URL of the category list.
    pub fn categories_url(&self) -> String {
        format!("{}/api/v1/categories.json", self.store_url)
    }

    /// Returns the catalog for `platform`.
    ///
    /// # Errors
    /// Returns error if the transport or cache store fails, or the payload is not a catalog
    pub fn catalog(&self, platform: &PlatformVersion) -> Result<Catalog> {
        self.query(&Self::catalog_key(platform), &self.catalog_url(platform))
    }

    /// Returns the marketplace category list.
    ///
    /// # Errors
    /// Returns error if the transport or cache store fails, or the payload is not a list of strings
    pub fn categories(&self) -> Result<Vec<String>> {
        self.query(CATEGORIES_KEY, &self.categories_url())
    }

    fn query<T: DeserializeOwned>(&self, key: &str, url: &str) -> Result<T> {
        let cache_available = self.store.is_available();

        if cache_available {
            if let Some(payload) = self.store.get(key)? {
                match serde_json::from_slice(&payload) {
                    Ok(data) => {
                        debug!(key = %key, "Catalog cache hit");
                        return Ok(data);
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "Discarding unreadable cached payload");
                    }
                }
            } else {
                debug!(key = %key, "Catalog cache miss");
            }
        }

        info!(url = %url, "Fetching from marketplace");
        let body = self.transport.get(url)?;
        let data = serde_json::from_slice(&body)?;

        if cache_available {
            self.store.set(key, &body, self.ttl)?;
        }

        Ok(data)
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("store_url", &self.store_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DisabledCache, MemoryCacheStore};
    use crate::transport::TransportResult;
    use std::path::Path;
    use std::sync::Mutex;

    /// Serves fixed bodies and records requested URLs.
    #[derive(Default)]
    struct StubTransport {
        body: Vec<u8>,
        requests: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn with_body(body: &str) -> Self {
            Self { body: body.as_bytes().to_vec(), requests: Mutex::default() }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        fn get(&self, url: &str) -> TransportResult<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }

        fn download(&self, _url: &str, _destination: &Path) -> TransportResult<u64> {
            unreachable!("catalog cache never downloads packages")
        }
    }

    const CATALOG: &str = r#"[{"id": "calendar", "categories": ["tools"], "releases": []}]"#;

    fn platform(version: &str) -> PlatformVersion {
        PlatformVersion::parse(version).unwrap()
    }

    #[test]
    fn test_catalog_key_truncates_to_three_components() {
        assert_eq!(CatalogCache::catalog_key(&platform("10.0.3.2")), "apps_10.0.3");
        assert_eq!(CatalogCache::catalog_key(&platform("9.1")), "apps_9.1");
        assert_eq!(CatalogCache::catalog_key(&platform("1.2")), "apps_1.2");
    }

    #[test]
    fn test_urls() {
        let cache = CatalogCache::new(
            "https://market.example.com/",
            Arc::new(StubTransport::default()),
            Arc::new(DisabledCache),
            Duration::from_secs(60),
        );
        assert_eq!(
            cache.catalog_url(&platform("10.0.3.2")),
            "https://market.example.com/api/v1/platform/10.0.3/apps.json"
        );
        assert_eq!(cache.categories_url(), "https://market.example.com/api/v1/categories.json");
    }

    #[test]
    fn test_cache_hit_skips_network() {
        let transport = Arc::new(StubTransport::with_body(CATALOG));
        let store = Arc::new(MemoryCacheStore::new());
        let cache = CatalogCache::new(
            "https://market.example.com",
            transport.clone(),
            store.clone(),
            Duration::from_secs(86400),
        );

        let first = cache.catalog(&platform("1.2")).unwrap();
        let second = cache.catalog(&platform("1.2")).unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.requests().len(), 1);
        assert!(store.get("apps_1.2").unwrap().is_some());
    }

    #[test]
    fn test_disabled_cache_always_fetches() {
        let transport = Arc::new(StubTransport::with_body(r#"["tools", "games"]"#));
        let cache = CatalogCache::new(
            "https://market.example.com",
            transport.clone(),
            Arc::new(DisabledCache),
            Duration::from_secs(86400),
        );

        assert_eq!(cache.categories().unwrap(), vec!["tools", "games"]);
        assert_eq!(cache.categories().unwrap(), vec!["tools", "games"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_unreadable_cached_payload_is_refetched() {
        let transport = Arc::new(StubTransport::with_body(CATALOG));
        let store = Arc::new(MemoryCacheStore::new());
        store.set("apps_9.1", b"not json", Duration::from_secs(60)).unwrap();

        let cache = CatalogCache::new(
            "https://market.example.com",
            transport.clone(),
            store.clone(),
            Duration::from_secs(60),
        );
        let catalog = cache.catalog(&platform("9.1")).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(store.get("apps_9.1").unwrap(), Some(CATALOG.as_bytes().to_vec()));
    }

    #[test]
    fn test_invalid_remote_payload_is_not_cached() {
        let transport = Arc::new(StubTransport::with_body("<html>maintenance</html>"));
        let store = Arc::new(MemoryCacheStore::new());
        let cache = CatalogCache::new(
            "https://market.example.com",
            transport,
            store.clone(),
            Duration::from_secs(60),
        );

        assert!(matches!(
            cache.catalog(&platform("9.1")),
            Err(crate::MarketError::InvalidPayload(_))
        ));
        assert_eq!(store.get("apps_9.1").unwrap(), None);
    }
}
