use std::io;
use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::{
    METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATED, METRIC_CACHE_MISS,
    METRIC_REQUEST_COALESCED,
};
use crate::config::{LogFormat, LoggingSettings};
use crate::wordpress::{METRIC_WP_REQUEST, METRIC_WP_REQUEST_ERROR, METRIC_WP_REQUEST_MS};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so that stdout stays reserved for command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register descriptions for every metric the data layer emits.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT,
            Unit::Count,
            "Total number of fresh response-cache hits."
        );
        describe_counter!(
            METRIC_CACHE_MISS,
            Unit::Count,
            "Total number of response-cache misses, stale entries included."
        );
        describe_counter!(
            METRIC_CACHE_EVICT,
            Unit::Count,
            "Total number of response-cache evictions due to capacity."
        );
        describe_counter!(
            METRIC_CACHE_INVALIDATED,
            Unit::Count,
            "Total number of response-cache entries removed by invalidation."
        );
        describe_counter!(
            METRIC_REQUEST_COALESCED,
            Unit::Count,
            "Total number of reads that joined an in-flight request."
        );
        describe_counter!(
            METRIC_WP_REQUEST,
            Unit::Count,
            "Total number of requests sent to the WordPress REST API."
        );
        describe_counter!(
            METRIC_WP_REQUEST_ERROR,
            Unit::Count,
            "Total number of WordPress requests that failed."
        );
        describe_histogram!(
            METRIC_WP_REQUEST_MS,
            Unit::Milliseconds,
            "WordPress request latency in milliseconds."
        );
    });
}
