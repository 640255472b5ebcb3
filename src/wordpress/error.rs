use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the WordPress data layer.
///
/// The type is `Clone` because a single coalesced fetch hands the same
/// outcome to every waiting caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },
    #[error("wordpress responded with status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("category `{slug}` not found (available: {})", available.join(", "))]
    CategoryNotFound { slug: String, available: Vec<String> },
    #[error("{resource} `{slug}` not found")]
    NotFound { resource: &'static str, slug: String },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// The thing asked for does not exist; offer browsing rather than retry.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::CategoryNotFound { .. } => true,
            Self::Http { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// A retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short machine-readable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::CategoryNotFound { .. } => "category_not_found",
            Self::NotFound { .. } => "not_found",
            Self::Decode { .. } => "decode",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::decode(error.to_string());
        }
        if error.is_builder() {
            return Self::invalid(error.to_string());
        }
        Self::network(error.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(error: url::ParseError) -> Self {
        Self::invalid(format!("invalid url: {error}"))
    }
}
