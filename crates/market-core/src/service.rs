//! Marketplace service: install, update and update detection for the host.
//!
//! [`MarketplaceService`] is the only component that talks to the host's
//! extension manager. Every check that can fail (installed state, catalog
//! lookup, release resolution, download) runs before the host is asked to
//! install or update anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cache::{CacheStore, MemoryCacheStore};
use crate::catalog::{Catalog, CatalogCache, CatalogEntry};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::host::{ExtensionHost, InstalledInfo, RequirementAnalyzer};
use crate::platform::PlatformVersionProvider;
use crate::resolver::ReleaseResolver;
use crate::transport::{HttpTransport, Transport};
use crate::updates::{UpdateDetector, UpdateInfo};

/// Marketplace client bound to one host application.
pub struct MarketplaceService {
    catalog: Arc<CatalogCache>,
    transport: Arc<dyn Transport>,
    host: Arc<dyn ExtensionHost>,
    platform: Arc<dyn PlatformVersionProvider>,
    analyzer: Arc<dyn RequirementAnalyzer>,
    download_dir: Option<PathBuf>,
}

impl MarketplaceService {
    /// Creates a service from its collaborators.
    ///
    /// `transport` is used for package downloads; catalog requests go through
    /// the transport `catalog` was built with.
    pub fn new(
        catalog: Arc<CatalogCache>,
        transport: Arc<dyn Transport>,
        host: Arc<dyn ExtensionHost>,
        platform: Arc<dyn PlatformVersionProvider>,
        analyzer: Arc<dyn RequirementAnalyzer>,
    ) -> Self {
        Self { catalog, transport, host, platform, analyzer, download_dir: None }
    }

    /// Creates a service with an HTTP transport and an in-memory catalog cache
    /// configured from `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(
        config: &MarketConfig,
        host: Arc<dyn ExtensionHost>,
        platform: Arc<dyn PlatformVersionProvider>,
        analyzer: Arc<dyn RequirementAnalyzer>,
    ) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(config)?);
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let catalog = Arc::new(CatalogCache::from_config(config, Arc::clone(&transport), store));

        let service = Self::new(catalog, transport, host, platform, analyzer);
        Ok(match &config.download_dir {
            Some(dir) => service.with_download_dir(dir),
            None => service,
        })
    }

    /// Creates package temp files in `dir` instead of the system temp dir.
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Installs the release of `id` matching the current platform version.
    ///
    /// # Errors
    /// Returns `AlreadyInstalled` if the host already has the extension, and
    /// catalog, resolution, download or host errors otherwise
    pub fn install(&self, id: &str) -> Result<()> {
        if self.installed_info(id)?.is_some() {
            return Err(MarketError::AlreadyInstalled(id.to_string()));
        }

        let package = self.download_package(id)?;
        info!(id = %id, path = %package.path().display(), "Installing extension");
        self.host.install(package.path())
    }

    /// Updates `id` to the release matching the current platform version.
    ///
    /// # Errors
    /// Returns `NotInstalled` if the host does not have the extension, and
    /// catalog, resolution, download or host errors otherwise
    pub fn update(&self, id: &str) -> Result<()> {
        if self.installed_info(id)?.is_none() {
            return Err(MarketError::NotInstalled(id.to_string()));
        }

        let package = self.download_package(id)?;
        info!(id = %id, path = %package.path().display(), "Updating extension");
        self.host.update(package.path())
    }

    /// Catalog entries for the current platform version, optionally limited to
    /// one category.
    ///
    /// # Errors
    /// Returns error if the catalog cannot be fetched or parsed
    pub fn list_apps(&self, category: Option<&str>) -> Result<Vec<CatalogEntry>> {
        let catalog = self.current_catalog()?;
        Ok(match category {
            Some(category) => catalog.in_category(category).cloned().collect(),
            None => catalog.into_entries(),
        })
    }

    /// The marketplace category list.
    ///
    /// # Errors
    /// Returns error if the category list cannot be fetched or parsed
    pub fn categories(&self) -> Result<Vec<String>> {
        self.catalog.categories()
    }

    /// Checks whether the host has an extension declaring `id`.
    ///
    /// # Errors
    /// Returns error if the host cannot list or describe its extensions
    pub fn is_installed(&self, id: &str) -> Result<bool> {
        Ok(self.installed_info(id)?.is_some())
    }

    /// Info of the first installed extension declaring `id`.
    ///
    /// # Errors
    /// Returns error if the host cannot list or describe its extensions
    pub fn installed_info(&self, id: &str) -> Result<Option<InstalledInfo>> {
        for handle in self.host.list_installed()? {
            if let Some(info) = self.host.info_of(&handle)? {
                if info.id == id {
                    return Ok(Some(info));
                }
            }
        }
        Ok(None)
    }

    /// Unmet requirements of an extension, as reported by the analyzer.
    pub fn missing_requirements(&self, metadata: &serde_json::Value) -> Vec<String> {
        self.analyzer.analyze(metadata)
    }

    /// Version `id` can be updated to, or `None` if it is up to date.
    ///
    /// # Errors
    /// Returns `NotInstalled` if the host does not have the extension and
    /// `UnknownExtension` if the catalog has no entry for it
    pub fn available_update_version(&self, id: &str) -> Result<Option<String>> {
        let info =
            self.installed_info(id)?.ok_or_else(|| MarketError::NotInstalled(id.to_string()))?;
        let catalog = self.current_catalog()?;
        Self::update_for(&catalog, &info)
    }

    /// Checks every installed extension for an available update.
    ///
    /// The result maps host-local identifiers to the update found. Extensions
    /// without a declared id or unknown to the marketplace are skipped.
    ///
    /// # Errors
    /// Returns error if the host cannot list its extensions or the catalog
    /// cannot be fetched
    pub fn scan_for_updates(&self) -> Result<BTreeMap<String, UpdateInfo>> {
        let catalog = self.current_catalog()?;
        let mut updates = BTreeMap::new();

        for handle in self.host.list_installed()? {
            let Some(info) = self.host.info_of(&handle)? else {
                debug!(handle = %handle, "Skipping extension without id");
                continue;
            };

            match Self::update_for(&catalog, &info) {
                Ok(Some(version)) => {
                    debug!(handle = %handle, id = %info.id, version = %version, "Update available");
                    updates.insert(handle, UpdateInfo { version, id: info.id });
                }
                Ok(None) => {}
                Err(e) if e.is_skippable() => {
                    debug!(handle = %handle, id = %info.id, error = %e, "Skipping extension");
                }
                Err(e) => return Err(e),
            }
        }

        info!(checked_against = catalog.len(), updates = updates.len(), "Update scan finished");
        Ok(updates)
    }

    fn current_catalog(&self) -> Result<Catalog> {
        self.catalog.catalog(&self.platform.current_version())
    }

    fn update_for(catalog: &Catalog, info: &InstalledInfo) -> Result<Option<String>> {
        let entry = catalog
            .find(&info.id)
            .ok_or_else(|| MarketError::UnknownExtension(info.id.clone()))?;
        Ok(UpdateDetector::available_update(&info.version, entry).map(str::to_string))
    }

    /// Downloads the release of `id` for the current platform into a temp file.
    ///
    /// The file is deleted when the returned handle is dropped.
    fn download_package(&self, id: &str) -> Result<NamedTempFile> {
        let platform = self.platform.current_version();
        let catalog = self.catalog.catalog(&platform)?;
        let release = ReleaseResolver::resolve_in(&catalog, id, &platform)?;

        let suffix = package_suffix(&release.download_url);
        let mut builder = tempfile::Builder::new();
        builder.prefix("market-").suffix(&suffix);
        let package = match &self.download_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        info!(id = %id, version = %release.version, url = %release.download_url, "Downloading package");
        self.transport.download(&release.download_url, package.path())?;
        Ok(package)
    }
}

impl std::fmt::Debug for MarketplaceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceService")
            .field("catalog", &self.catalog)
            .field("download_dir", &self.download_dir)
            .finish_non_exhaustive()
    }
}

/// Temp file suffix for a package URL: its file extension with the leading dot.
fn package_suffix(url: &str) -> String {
    let path = reqwest::Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.to_string());

    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
