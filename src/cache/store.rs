//! Time-bounded response store.
//!
//! Entries expire on read: an entry whose age has reached the configured
//! timeout is dropped the next time anyone looks at it. There is no
//! background sweep. Capacity is bounded with LRU eviction.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;
use tracing::{debug, info};

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub(crate) const METRIC_CACHE_HIT: &str = "hub_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "hub_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "hub_cache_evict_total";
pub(crate) const METRIC_CACHE_INVALIDATED: &str = "hub_cache_invalidated_total";

/// A stored payload together with the instant it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub payload: V,
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    fn is_fresh(&self, timeout: Duration) -> bool {
        self.age() < timeout
    }
}

/// Response store keyed by request signature.
///
/// Payloads are handed out as clones; nothing outside the store holds a
/// reference into it.
pub struct ResponseStore<V> {
    entries: RwLock<LruCache<String, CacheEntry<V>>>,
    timeout: Duration,
}

impl<V: Clone> ResponseStore<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity_non_zero())),
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the entry for `key` if it is still fresh. Stale entries are
    /// removed as a side effect.
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let fresh = match entries.get(key) {
            Some(entry) => entry.is_fresh(self.timeout),
            None => {
                counter!(METRIC_CACHE_MISS).increment(1);
                return None;
            }
        };

        if fresh {
            counter!(METRIC_CACHE_HIT).increment(1);
            debug!(target = SOURCE, key, "cache hit");
            entries.get(key).cloned()
        } else {
            entries.pop(key);
            counter!(METRIC_CACHE_MISS).increment(1);
            debug!(target = SOURCE, key, "cache entry expired");
            None
        }
    }

    /// Payload-only variant of [`ResponseStore::get`].
    pub fn get_fresh(&self, key: &str) -> Option<V> {
        self.get(key).map(|entry| entry.payload)
    }

    /// Store `payload` under `key`, replacing any previous entry and
    /// restarting its freshness window.
    pub fn put(&self, key: impl Into<String>, payload: V) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            payload,
            stored_at: Instant::now(),
        };
        let displaced = rw_write(&self.entries, SOURCE, "put").push(key.clone(), entry);
        if let Some((evicted, _)) = displaced {
            if evicted != key {
                counter!(METRIC_CACHE_EVICT).increment(1);
                debug!(target = SOURCE, key = %evicted, "cache entry evicted");
            }
        }
    }

    /// True iff an entry exists for `key` and it is younger than the timeout.
    pub fn is_fresh(&self, key: &str) -> bool {
        rw_read(&self.entries, SOURCE, "is_fresh")
            .peek(key)
            .is_some_and(|entry| entry.is_fresh(self.timeout))
    }

    /// Remove every entry whose key contains `pattern`, or every entry when
    /// no pattern is given. Returns the number of removed entries.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "invalidate");
        let removed = match pattern {
            None => {
                let count = entries.len();
                entries.clear();
                count
            }
            Some(pattern) => {
                let matching: Vec<String> = entries
                    .iter()
                    .filter(|(key, _)| key.contains(pattern))
                    .map(|(key, _)| key.clone())
                    .collect();
                for key in &matching {
                    entries.pop(key);
                }
                matching.len()
            }
        };
        drop(entries);

        counter!(METRIC_CACHE_INVALIDATED).increment(removed as u64);
        info!(
            target = SOURCE,
            pattern = pattern.unwrap_or("*"),
            removed,
            "cache invalidated"
        );
        removed
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
