//! Update detection for installed extensions.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::version::VersionComparator;

/// An available update found by a bulk scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// Version the extension can be updated to.
    pub version: String,

    /// Marketplace id of the extension.
    pub id: String,
}

/// Update detector for installed extensions.
pub struct UpdateDetector;

impl UpdateDetector {
    /// Returns the version of the first release in `entry` that is strictly newer
    /// than `installed`, in server order.
    ///
    /// Uses standard comparison without truncation. `None` means the extension
    /// is up to date.
    pub fn available_update<'a>(installed: &str, entry: &'a CatalogEntry) -> Option<&'a str> {
        entry
            .releases
            .iter()
            .map(|release| release.version.as_str())
            .find(|version| VersionComparator::is_newer(version, installed))
    }
}
