//! Remote catalog data model.
//!
//! A catalog is the marketplace's listing of extensions for one platform
//! version. Entries and their releases keep the order the server sent them in;
//! release selection depends on that order.

pub mod cache;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use cache::CatalogCache;

/// One downloadable version of an extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Release version.
    #[serde(deserialize_with = "version_string")]
    pub version: String,

    /// Lowest compatible platform version. `None` means no lower bound.
    #[serde(default, deserialize_with = "optional_version_string")]
    pub platform_min: Option<String>,

    /// Highest compatible platform version. `None` means no upper bound.
    #[serde(default, deserialize_with = "optional_version_string")]
    pub platform_max: Option<String>,

    /// Download URL for the release package.
    #[serde(rename = "download", alias = "downloadUrl")]
    pub download_url: String,

    /// Any other fields the server sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One extension in the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Extension id, unique within a catalog snapshot.
    pub id: String,

    /// Category tags.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Releases in server order.
    #[serde(default)]
    pub releases: Vec<Release>,

    /// Any other fields the server sent (name, description, dependencies, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Checks whether the entry is tagged with `category`.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Display name, if the server sent one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// The catalog for one platform version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wraps a list of entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Looks up the first entry with the given id.
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries tagged with `category`, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.has_category(category))
    }

    /// Iterates over all entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the catalog, returning its entries.
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Versions arrive as strings, but some servers emit bare numbers (`"platformMin": 9`).
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<VersionValue> for String {
    fn from(value: VersionValue) -> Self {
        match value {
            VersionValue::Text(text) => text.trim().to_string(),
            VersionValue::Number(number) => number.to_string(),
        }
    }
}

fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    VersionValue::deserialize(deserializer).map(String::from)
}

/// Null, missing and blank bounds all mean "no bound".
fn optional_version_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<VersionValue>::deserialize(deserializer)?;
    Ok(value.map(String::from).filter(|version| !version.is_empty()))
}
