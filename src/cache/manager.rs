// Response cache - bounded LRU with strict time-to-live

use crate::cache::models::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::gateway::Mode;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::debug;

/// In-memory cache of model responses keyed by normalized `(mode, prompt)`.
///
/// The map sits behind a single mutex that is never held across an await, so
/// lookups, inserts and evictions are atomic with respect to each other.
/// A hit refreshes LRU recency but never the entry's age.
pub struct ResponseCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl())
    }

    /// Build the cache key: mode name, a colon, then the trimmed lowercase prompt.
    pub fn key(mode: Mode, prompt: &str) -> String {
        format!("{}:{}", mode.as_str(), prompt.trim().to_lowercase())
    }

    /// Look up a response. Expired entries are dropped and reported as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.inner.lock();
        if let Some(entry) = cache.get(key) {
            if !entry.is_expired(self.ttl) {
                return Some(entry.response.clone());
            }
            cache.pop(key);
            debug!("Dropped expired cache entry");
        }
        None
    }

    /// Insert or overwrite a response, evicting the least recently used entry
    /// when the cache is full. Returns the evicted key, if any.
    pub fn insert(&self, key: String, response: String) -> Option<String> {
        let mut cache = self.inner.lock();
        match cache.push(key.clone(), CacheEntry::new(response)) {
            Some((evicted, _)) if evicted != key => {
                debug!(len = cache.len(), "Evicted least recently used cache entry");
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
        debug!("Cache cleared");
    }

    /// Snapshot of live size, capacity and TTL. Does not touch recency.
    pub fn stats(&self) -> CacheStats {
        let cache = self.inner.lock();
        let size = cache
            .iter()
            .filter(|(_, entry)| !entry.is_expired(self.ttl))
            .count();

        CacheStats {
            size,
            capacity: cache.cap().get(),
            ttl: self.ttl,
        }
    }

    /// Number of stored entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
