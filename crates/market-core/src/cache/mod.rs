//! Key-value cache stores for marketplace responses.
//!
//! The catalog layer only needs three things from a cache: whether it is usable
//! right now, a lookup, and a write with a time-to-live. Hosts with a
//! distributed cache implement [`CacheStore`] themselves; [`MemoryCacheStore`]
//! and [`DisabledCache`] cover the in-process and "no cache" cases.

pub mod memory;

use std::time::Duration;
use thiserror::Error;

pub use memory::{CacheStats, MemoryCacheStore};

/// Errors reported by a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store's internal lock was poisoned by a panicking writer.
    #[error("cache lock poisoned")]
    LockPoisoned,

    /// Backend-specific failure (connection lost, quota exceeded, ...).
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Result type for cache store operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// A key-value store with per-entry expiry.
pub trait CacheStore: Send + Sync {
    /// Whether the store can be used for this operation.
    fn is_available(&self) -> bool;

    /// Looks up a key. Expired entries read as absent.
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;
}

/// A store that is never available. Every query goes to the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

impl CacheStore for DisabledCache {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }
}
