//! Shared test utilities for Market Core integration tests.
//!
//! Provides an in-memory extension host, a transport that serves canned
//! responses and counts requests, and helpers to wire them into a service.

#![allow(dead_code)]

use market_core::transport::TransportResult;
use market_core::cache::CacheResult;
use market_core::{
    CacheError, CacheStore, CatalogCache, ExtensionHost, InstalledInfo, MarketError, MarketplaceService,
    PlatformVersion, Result, Transport, TransportError, host::NoRequirements,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Base URL the fake transport is registered under.
pub const STORE_URL: &str = "https://market.test";

/// What the host was asked to do with a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Install { path: PathBuf, contents: Vec<u8> },
    Update { path: PathBuf, contents: Vec<u8> },
}

/// Extension host backed by a list of `(handle, info)` pairs.
///
/// Records every install/update call together with the package contents,
/// read while the package file still exists.
#[derive(Default)]
pub struct FakeHost {
    installed: Vec<(String, Option<InstalledInfo>)>,
    calls: Mutex<Vec<HostCall>>,
    rejection: Option<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an installed extension whose handle equals its id.
    pub fn with_installed(self, id: &str, version: &str) -> Self {
        self.with_handle(id, id, version)
    }

    /// Adds an installed extension under a host-local handle.
    pub fn with_handle(mut self, handle: &str, id: &str, version: &str) -> Self {
        self.installed.push((handle.to_string(), Some(InstalledInfo::new(id, version))));
        self
    }

    /// Adds an installed extension that declares no id.
    pub fn with_anonymous(mut self, handle: &str) -> Self {
        self.installed.push((handle.to_string(), None));
        self
    }

    /// Makes install and update record the call, then fail with `MarketError::Host(message)`.
    pub fn rejecting(mut self, message: &str) -> Self {
        self.rejection = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExtensionHost for FakeHost {
    fn list_installed(&self) -> Result<Vec<String>> {
        Ok(self.installed.iter().map(|(handle, _)| handle.clone()).collect())
    }

    fn info_of(&self, handle: &str) -> Result<Option<InstalledInfo>> {
        self.installed
            .iter()
            .find(|(h, _)| h == handle)
            .map(|(_, info)| info.clone())
            .ok_or_else(|| MarketError::Host(format!("no such extension: {handle}")))
    }

    fn install(&self, package: &Path) -> Result<()> {
        let contents = std::fs::read(package)?;
        self.record(HostCall::Install { path: package.to_path_buf(), contents })
    }

    fn update(&self, package: &Path) -> Result<()> {
        let contents = std::fs::read(package)?;
        self.record(HostCall::Update { path: package.to_path_buf(), contents })
    }
}

impl FakeHost {
    fn record(&self, call: HostCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.rejection {
            Some(message) => Err(MarketError::Host(message.clone())),
            None => Ok(()),
        }
    }
}

/// Cache store that claims to be available but fails on `get` and/or `set`.
#[derive(Default)]
pub struct FailingStore {
    fail_get: bool,
    fail_set: bool,
    gets: Mutex<usize>,
    sets: Mutex<usize>,
}

impl FailingStore {
    /// Every lookup fails.
    pub fn failing_get() -> Self {
        Self { fail_get: true, ..Self::default() }
    }

    /// Lookups miss and every write fails.
    pub fn failing_set() -> Self {
        Self { fail_set: true, ..Self::default() }
    }

    pub fn get_count(&self) -> usize {
        *self.gets.lock().unwrap()
    }

    pub fn set_count(&self) -> usize {
        *self.sets.lock().unwrap()
    }
}

impl CacheStore for FailingStore {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        *self.gets.lock().unwrap() += 1;
        if self.fail_get {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        *self.sets.lock().unwrap() += 1;
        if self.fail_set {
            return Err(CacheError::Backend("quota exceeded".to_string()));
        }
        Ok(())
    }
}

/// Transport serving canned bodies by URL and counting requests.
#[derive(Default)]
pub struct CountingTransport {
    routes: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `path` below [`STORE_URL`].
    pub fn route(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(format!("{STORE_URL}{path}"), body.into());
        self
    }

    /// Serves `body` for an absolute URL.
    pub fn route_url(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn serve(&self, url: &str) -> TransportResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status { url: url.to_string(), status: 404 })
    }
}

impl Transport for CountingTransport {
    fn get(&self, url: &str) -> TransportResult<Vec<u8>> {
        self.serve(url)
    }

    fn download(&self, url: &str, destination: &Path) -> TransportResult<u64> {
        let body = self.serve(url)?;
        std::fs::write(destination, &body)?;
        Ok(body.len() as u64)
    }
}

pub fn platform(version: &str) -> PlatformVersion {
    PlatformVersion::parse(version).unwrap()
}

/// Builds a service over the given fakes with a 24h cache TTL.
pub fn service(
    transport: Arc<CountingTransport>,
    store: Arc<dyn CacheStore>,
    host: Arc<FakeHost>,
    version: &str,
) -> MarketplaceService {
    let catalog =
        Arc::new(CatalogCache::new(STORE_URL, transport.clone(), store, Duration::from_secs(86400)));
    MarketplaceService::new(
        catalog,
        transport,
        host,
        Arc::new(platform(version)),
        Arc::new(NoRequirements),
    )
}

/// Catalog for platform 10.0 with three extensions.
pub const CATALOG_10: &str = r#"[
    {
        "id": "calendar",
        "name": "Calendar",
        "categories": ["productivity"],
        "releases": [
            {"version": "2.0.0", "platformMin": "11", "download": "https://downloads.test/calendar-2.0.0.tar.gz"},
            {"version": "1.6.0", "platformMin": "10", "platformMax": "10", "download": "https://downloads.test/calendar-1.6.0.tar.gz"},
            {"version": "1.0.0", "platformMax": "9", "download": "https://downloads.test/calendar-1.0.0.tar.gz"}
        ]
    },
    {
        "id": "music",
        "categories": ["multimedia"],
        "releases": [
            {"version": "0.9.0", "platformMin": "10", "download": "https://downloads.test/music-0.9.0.zip"}
        ]
    },
    {
        "id": "tasks",
        "categories": ["productivity", "tools"],
        "releases": [
            {"version": "3.1.0", "platformMin": "12", "download": "https://downloads.test/tasks-3.1.0.tar.gz"}
        ]
    }
]"#;

/// Path of the catalog for platform 10.0.x.
pub const CATALOG_10_PATH: &str = "/api/v1/platform/10.0.3/apps.json";
