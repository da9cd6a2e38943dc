//! Cache entry and statistics models.

use serde::{Serialize, Serializer};
use std::time::Duration;
use tokio::time::Instant;

/// A cached model response with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub response: String,
    pub inserted_at: Instant,
}

impl CacheEntry {
    pub fn new(response: String) -> Self {
        Self {
            response,
            inserted_at: Instant::now(),
        }
    }

    /// An entry is expired once it reaches the TTL; hits never extend it.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Read-only snapshot of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of live (unexpired) entries.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Entry lifetime, serialized in seconds.
    #[serde(serialize_with = "serialize_secs")]
    pub ttl: Duration,
}

fn serialize_secs<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ttl.as_secs())
}
