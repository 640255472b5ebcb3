//! Single-flight request coalescing.
//!
//! Concurrent callers asking for the same request signature share one
//! underlying future. The first caller (leader) registers the future; later
//! callers (followers) clone the shared handle and observe the same outcome,
//! success or error. The fetch runs on its own task, so it settles and
//! unregisters itself even when every caller has been dropped; a failed
//! fetch never stays registered.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use metrics::counter;
use tracing::debug;

use crate::wordpress::ApiError;

const SOURCE: &str = "cache::coalescer";

pub(crate) const METRIC_REQUEST_COALESCED: &str = "hub_request_coalesced_total";

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, ApiError>>>;

/// Tracks in-flight fetches keyed by request signature.
pub struct RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    in_flight: Arc<DashMap<String, SharedFetch<T>>>,
}

impl<T> RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Join the in-flight fetch for `key`, or start one with `factory`.
    pub async fn dedupe<F, Fut>(&self, key: &str, factory: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.dedupe_or_probe(key, || None, factory).await
    }

    /// Like [`RequestCoalescer::dedupe`], but runs `probe` before starting a
    /// new fetch. The probe runs while the registry slot for `key` is locked,
    /// so "check the cache, then register the fetch" cannot interleave with a
    /// leader that is populating the cache and unregistering itself.
    pub async fn dedupe_or_probe<P, F, Fut>(
        &self,
        key: &str,
        probe: P,
        factory: F,
    ) -> Result<T, ApiError>
    where
        P: FnOnce() -> Option<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let shared = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(existing) => {
                counter!(METRIC_REQUEST_COALESCED).increment(1);
                debug!(target = SOURCE, key, "joining in-flight request");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                if let Some(hit) = probe() {
                    return Ok(hit);
                }

                let registry = Arc::clone(&self.in_flight);
                let owned_key = key.to_string();
                let fetch = factory();
                let task = tokio::spawn(async move {
                    let outcome = fetch.await;
                    registry.remove(&owned_key);
                    outcome
                });
                let shared = task
                    .map(|joined| {
                        joined.unwrap_or_else(|err| {
                            Err(ApiError::network(format!("fetch task aborted: {err}")))
                        })
                    })
                    .boxed()
                    .shared();
                slot.insert(shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Number of fetches currently registered.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }
}

impl<T> Default for RequestCoalescer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
