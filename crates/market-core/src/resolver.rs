//! Release selection against the host platform version.

use crate::catalog::{Catalog, CatalogEntry, Release};
use crate::error::{MarketError, Result};
use crate::platform::PlatformVersion;
use crate::version::{Operator, VersionComparator};

/// Picks the release of a catalog entry that applies to a platform version.
///
/// Releases are considered in the order the server sent them and the first
/// admissible one wins, even if a later one carries a higher version.
pub struct ReleaseResolver;

impl ReleaseResolver {
    /// Checks whether the bounds of `release` admit `platform`.
    ///
    /// Bounds are compared after truncating both sides to the shorter
    /// version, so a bound of `"9"` admits every `9.x` platform. A missing
    /// bound never disqualifies.
    pub fn admits(release: &Release, platform: &str) -> bool {
        let below_min = release
            .platform_min
            .as_deref()
            .is_some_and(|min| VersionComparator::compare(platform, min, Operator::Lt));
        let above_max = release
            .platform_max
            .as_deref()
            .is_some_and(|max| VersionComparator::compare(platform, max, Operator::Gt));

        !below_min && !above_max
    }

    /// All releases of `entry` admitting `platform`, in server order.
    pub fn candidates<'a>(
        entry: &'a CatalogEntry,
        platform: &PlatformVersion,
    ) -> impl Iterator<Item = &'a Release> + use<'a> {
        let platform = platform.to_string();
        entry.releases.iter().filter(move |release| Self::admits(release, &platform))
    }

    /// Selects the first release of `entry` admitting `platform`.
    ///
    /// # Errors
    /// Returns `NoMatchingRelease` if no release admits the platform version
    pub fn resolve<'a>(entry: &'a CatalogEntry, platform: &PlatformVersion) -> Result<&'a Release> {
        Self::candidates(entry, platform).next().ok_or_else(|| MarketError::NoMatchingRelease {
            id: entry.id.clone(),
            platform: platform.to_string(),
        })
    }

    /// Looks up `id` in `catalog` and selects its release for `platform`.
    ///
    /// # Errors
    /// Returns `UnknownExtension` if the catalog has no entry for `id`,
    /// `NoMatchingRelease` if no release admits the platform version
    pub fn resolve_in<'a>(
        catalog: &'a Catalog,
        id: &str,
        platform: &PlatformVersion,
    ) -> Result<&'a Release> {
        let entry = catalog.find(id).ok_or_else(|| MarketError::UnknownExtension(id.to_string()))?;
        Self::resolve(entry, platform)
    }
}
