//! Collaborators provided by the host application.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Id and version an installed extension declares about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledInfo {
    /// Marketplace id.
    pub id: String,

    /// Installed version.
    pub version: String,
}

impl InstalledInfo {
    /// Creates installed-extension info.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { id: id.into(), version: version.into() }
    }
}

/// The host's extension manager.
///
/// Extensions are addressed by a host-local identifier (an install folder, a
/// package handle, ...) which need not equal the marketplace id.
pub trait ExtensionHost: Send + Sync {
    /// Host-local identifiers of all installed extensions.
    fn list_installed(&self) -> Result<Vec<String>>;

    /// Declared id and version of the extension behind `handle`.
    ///
    /// Returns `None` when the extension declares no id.
    fn info_of(&self, handle: &str) -> Result<Option<InstalledInfo>>;

    /// Installs the package at `package`.
    fn install(&self, package: &Path) -> Result<()>;

    /// Updates an installed extension from the package at `package`.
    fn update(&self, package: &Path) -> Result<()>;
}

/// Dependency analysis of extension metadata.
pub trait RequirementAnalyzer: Send + Sync {
    /// Descriptions of the requirements in `metadata` the host does not meet.
    fn analyze(&self, metadata: &serde_json::Value) -> Vec<String>;
}

/// Analyzer that reports nothing missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRequirements;

impl RequirementAnalyzer for NoRequirements {
    fn analyze(&self, _metadata: &serde_json::Value) -> Vec<String> {
        Vec::new()
    }
}
