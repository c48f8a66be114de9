//! Host platform version.

use crate::error::{MarketError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The host application's own version, e.g. `9.1.5`.
///
/// Always holds at least one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformVersion {
    components: Vec<u64>,
}

impl PlatformVersion {
    /// Builds a platform version from its numeric components.
    ///
    /// # Errors
    /// Returns `InvalidPlatformVersion` if `components` is empty.
    pub fn new(components: Vec<u64>) -> Result<Self> {
        if components.is_empty() {
            return Err(MarketError::InvalidPlatformVersion(
                "platform version needs at least one component".to_string(),
            ));
        }
        Ok(Self { components })
    }

    /// Parses a dotted version string such as `"10.0.3"`.
    ///
    /// # Errors
    /// Returns `InvalidPlatformVersion` for empty or non-numeric components
    pub fn parse(version: &str) -> Result<Self> {
        let version = version.trim();
        let components = version
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| MarketError::InvalidPlatformVersion(version.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(components)
    }

    /// The numeric components, most significant first.
    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl FromStr for PlatformVersion {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PlatformVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlatformVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Supplies the running host's platform version.
pub trait PlatformVersionProvider: Send + Sync {
    /// Returns the current platform version.
    fn current_version(&self) -> PlatformVersion;
}

/// A fixed version is its own provider.
impl PlatformVersionProvider for PlatformVersion {
    fn current_version(&self) -> PlatformVersion {
        self.clone()
    }
}
