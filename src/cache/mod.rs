//! Response caching for the WordPress data layer.
//!
//! Two cooperating pieces sit between callers and the network:
//!
//! - **Response store**: signature → normalized payload, fresh for a fixed
//!   timeout, invalidated by substring pattern or wholesale.
//! - **Request coalescer**: at most one network fetch in flight per
//!   signature; concurrent callers await the same outcome.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! timeout_seconds = 300
//! capacity = 256
//! ```

mod coalescer;
mod config;
mod keys;
mod lock;
mod store;

pub use coalescer::RequestCoalescer;
pub use config::CacheConfig;
pub use keys::RequestSignature;
pub use store::{CacheEntry, ResponseStore};

pub(crate) use coalescer::METRIC_REQUEST_COALESCED;
pub(crate) use store::{
    METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATED, METRIC_CACHE_MISS,
};
