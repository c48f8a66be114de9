//! Market Core - Extension marketplace client.
//!
//! This crate provides the marketplace side of a host application's
//! extension management:
//! - Catalog fetching behind a TTL cache
//! - Release selection against the host platform version
//! - Update detection for installed extensions
//! - Package download and hand-off to the host for install/update
//!
//! # Example
//!
//! ```rust,no_run
//! use market_core::{MarketConfig, MarketplaceService, PlatformVersion, host::NoRequirements};
//! use std::sync::Arc;
//!
//! # fn run(host: Arc<dyn market_core::ExtensionHost>) -> market_core::Result<()> {
//! let config = MarketConfig::load()?;
//! let platform = Arc::new(PlatformVersion::parse("10.0.3")?);
//! let service = MarketplaceService::from_config(&config, host, platform, Arc::new(NoRequirements))?;
//!
//! for (handle, update) in service.scan_for_updates()? {
//!     println!("{handle}: {} -> {}", update.id, update.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod platform;
pub mod resolver;
pub mod service;
pub mod transport;
pub mod updates;
pub mod version;

pub use cache::{CacheError, CacheStats, CacheStore, DisabledCache, MemoryCacheStore};
pub use catalog::{Catalog, CatalogCache, CatalogEntry, Release};
pub use config::{ConfigError, MarketConfig};
pub use error::{MarketError, Result};
pub use host::{ExtensionHost, InstalledInfo, RequirementAnalyzer};
pub use platform::{PlatformVersion, PlatformVersionProvider};
pub use resolver::ReleaseResolver;
pub use service::MarketplaceService;
pub use transport::{HttpTransport, Transport, TransportError};
pub use updates::{UpdateDetector, UpdateInfo};
pub use version::{Operator, VersionComparator};
