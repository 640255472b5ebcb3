//! WordPress REST API access: transport, error taxonomy, query filters,
//! category resolution and the caching `ApiClient` facade.

mod client;
mod error;
pub mod query;
pub mod resolver;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use query::{CachePolicy, PostQuery};
pub use resolver::{CategorySource, resolve_slug_to_id};
pub use transport::{Pagination, Transport};

pub(crate) use transport::{METRIC_WP_REQUEST, METRIC_WP_REQUEST_ERROR, METRIC_WP_REQUEST_MS};
