//! Request signatures.
//!
//! A signature is the identity of a read request for both the response
//! store and the in-flight registry. It is built from the endpoint path and
//! a sorted, url-encoded rendering of the query parameters, so callers may
//! supply parameters in any order.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSignature(String);

impl RequestSignature {
    pub fn new<'a, I>(endpoint: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let sorted: BTreeMap<&str, &str> = params.into_iter().collect();
        let endpoint = endpoint.trim_matches('/');
        if sorted.is_empty() {
            return Self(endpoint.to_string());
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in sorted {
            query.append_pair(key, value);
        }
        Self(format!("{endpoint}?{}", query.finish()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring test used by pattern invalidation.
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl fmt::Display for RequestSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RequestSignature> for String {
    fn from(signature: RequestSignature) -> Self {
        signature.0
    }
}
