//! Cache configuration.
//!
//! Controls the response cache that sits in front of the WordPress API.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 5 * 60;
const DEFAULT_CAPACITY: usize = 256;

/// Cache configuration from `hub.toml` (`[cache]` table).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve repeated reads from memory.
    pub enabled: bool,
    /// Seconds an entry stays fresh after it was stored.
    pub timeout_seconds: u64,
    /// Maximum number of cached responses before LRU eviction.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
