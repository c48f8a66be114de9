//! In-process cache store with time-to-live expiry.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CacheError, CacheResult, CacheStore};

/// A cached payload and the instant it stops being served.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Cache statistics for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry.
    pub hits: u64,
    /// Lookups that found nothing or only an expired entry.
    pub misses: u64,
    /// Number of writes.
    pub writes: u64,
    /// Entries currently held, fresh or not.
    pub entries: usize,
}

/// Cache store backed by a `HashMap` behind an `RwLock`.
///
/// Entries are never deleted explicitly; an expired entry reads as absent and
/// is overwritten by the next write to its key.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: RwLock<CacheStats>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current cache statistics.
    pub fn stats(&self) -> CacheResult<CacheStats> {
        let mut stats = self.stats.read().map_err(|_| CacheError::LockPoisoned)?.clone();
        stats.entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?.len();
        Ok(stats)
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) -> CacheResult<()> {
        let mut stats = self.stats.write().map_err(|_| CacheError::LockPoisoned)?;
        update(&mut stats);
        Ok(())
    }
}

impl CacheStore for MemoryCacheStore {
    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let payload = {
            let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
            entries
                .get(key)
                .filter(|entry| entry.is_fresh(Instant::now()))
                .map(|entry| entry.payload.clone())
        };

        if payload.is_some() {
            self.record(|stats| stats.hits += 1)?;
            debug!(key = %key, "Memory cache hit");
        } else {
            self.record(|stats| stats.misses += 1)?;
            debug!(key = %key, "Memory cache miss");
        }
        Ok(payload)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let entry = CacheEntry { payload: value.to_vec(), expires_at: Instant::now() + ttl };
        self.entries
            .write()
            .map_err(|_| CacheError::LockPoisoned)?
            .insert(key.to_string(), entry);
        self.record(|stats| stats.writes += 1)
    }
}
