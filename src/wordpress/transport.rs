//! Thin HTTP layer over the WordPress REST API.
//!
//! One `Transport` per client. Every request carries a hard timeout and is
//! counted and timed; no retries happen here.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use hub_wp_types::WpErrorBody;
use metrics::{counter, histogram};
use reqwest::header::{CACHE_CONTROL, HeaderMap, PRAGMA};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::ApiError;

const SOURCE: &str = "wordpress::transport";

pub(crate) const METRIC_WP_REQUEST: &str = "hub_wp_request_total";
pub(crate) const METRIC_WP_REQUEST_ERROR: &str = "hub_wp_request_error_total";
pub(crate) const METRIC_WP_REQUEST_MS: &str = "hub_wp_request_ms";

const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";
const TOTAL_HEADER: &str = "x-wp-total";
const CACHE_BUST_PARAM: &str = "_t";

/// Pagination totals reported by WordPress list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total_pages: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_pages: 1,
            total: 0,
        }
    }
}

impl Pagination {
    fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
        };
        let defaults = Self::default();
        Self {
            total_pages: read(TOTAL_PAGES_HEADER)
                .and_then(|pages| u32::try_from(pages).ok())
                .unwrap_or(defaults.total_pages),
            total: read(TOTAL_HEADER).unwrap_or(defaults.total),
        }
    }
}

/// Sends requests relative to the REST base URL.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    base: Url,
    timeout: Duration,
    bust_counter: AtomicU64,
}

impl Transport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = normalize_base(base_url)?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(ApiError::from)?;
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Ok(Self {
            client,
            base,
            timeout,
            bust_counter: AtomicU64::new(seed),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("dataengineer-hub/", env!("CARGO_PKG_VERSION"))
    }

    /// `GET {base}/{endpoint}?{params}` decoded as JSON.
    ///
    /// Freshness is owned by the response store, so every GET tells
    /// intermediaries not to serve a cached copy and carries a unique `_t`
    /// parameter against URL-keyed caches.
    pub async fn get<T>(
        &self,
        endpoint: &str,
        params: &BTreeMap<&'static str, String>,
    ) -> Result<(T, Pagination), ApiError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.url(endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            let nonce = self.bust_counter.fetch_add(1, Ordering::Relaxed);
            pairs.append_pair(CACHE_BUST_PARAM, &nonce.to_string());
        }

        let request = self
            .client
            .request(Method::GET, url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        let (headers, bytes) = self.execute("GET", endpoint, request).await?;
        let value = decode_body(&bytes)?;
        Ok((value, Pagination::from_headers(&headers)))
    }

    /// `POST {base}/{endpoint}` with a JSON body.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint)?;
        let request = self.client.request(Method::POST, url).json(body);
        let (_, bytes) = self.execute("POST", endpoint, request).await?;
        decode_body(&bytes)
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base
            .join(endpoint.trim_start_matches('/'))
            .map_err(ApiError::from)
    }

    async fn execute(
        &self,
        method: &'static str,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<(HeaderMap, Vec<u8>), ApiError> {
        let endpoint_label = endpoint_label(endpoint);
        counter!(METRIC_WP_REQUEST, "method" => method, "endpoint" => endpoint_label.clone())
            .increment(1);
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, send(request)).await {
            Ok(result) => result.map_err(|err| self.classify(err)),
            Err(_) => Err(ApiError::Timeout {
                after: self.timeout,
            }),
        };

        let elapsed = started.elapsed();
        histogram!(METRIC_WP_REQUEST_MS, "method" => method, "endpoint" => endpoint_label.clone())
            .record(elapsed.as_secs_f64() * 1000.0);

        let (status, headers, bytes) = match outcome {
            Ok(parts) => parts,
            Err(err) => {
                counter!(METRIC_WP_REQUEST_ERROR, "method" => method, "endpoint" => endpoint_label, "kind" => err.kind())
                    .increment(1);
                return Err(err);
            }
        };

        debug!(
            target = SOURCE,
            method,
            endpoint,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "wordpress request completed"
        );

        if !status.is_success() {
            counter!(METRIC_WP_REQUEST_ERROR, "method" => method, "endpoint" => endpoint_label, "kind" => "http")
                .increment(1);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }

        Ok((headers, bytes))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                after: self.timeout,
            }
        } else {
            ApiError::from(err)
        }
    }
}

async fn send(request: RequestBuilder) -> Result<(StatusCode, HeaderMap, Vec<u8>), reqwest::Error> {
    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.bytes().await?;
    Ok((status, headers, bytes.to_vec()))
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::decode(err.to_string()))
}

/// Parse and normalise the REST base so that relative joins append to it.
pub fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::invalid(format!(
            "base url must be an absolute http(s) url, got `{base_url}`"
        )));
    }
    Ok(url)
}

/// Best human-readable message for a non-2xx response: the WordPress error
/// envelope's `message`, else the raw body, else the status reason.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<WpErrorBody>(body) {
        if let Some(message) = envelope.message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

fn endpoint_label(endpoint: &str) -> String {
    endpoint
        .trim_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
