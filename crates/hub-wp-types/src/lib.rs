//! Raw WordPress REST v2 payloads as they arrive on the wire.
//!
//! These types mirror only the fields the hub reads. Every field carries a
//! serde default because WordPress omits or nulls fields depending on the
//! installed plugins and on whether `_embed` was requested.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `{ "rendered": "..." }` envelope used for titles, excerpts and bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl Rendered {
    pub fn new(rendered: impl Into<String>) -> Self {
        Self {
            rendered: rendered.into(),
        }
    }
}

/// A post record from `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub categories: Vec<u64>,
    /// Registered post meta. WordPress serialises an empty meta set as `[]`,
    /// so this stays untyped.
    #[serde(default)]
    pub meta: Option<Value>,
    /// Advanced Custom Fields block, `false` when ACF has nothing to report.
    #[serde(default)]
    pub acf: Option<Value>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<WpEmbedded>,
}

/// The `_embedded` block returned when `_embed=true` is requested.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WpEmbedded {
    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<WpMedia>,
    /// One inner list per taxonomy, categories first and tags second.
    #[serde(default, rename = "wp:term")]
    pub terms: Vec<Vec<WpTerm>>,
    #[serde(default)]
    pub author: Vec<WpAuthor>,
}

/// An embedded media item. Missing media embeds an error object instead,
/// which deserialises with `source_url == None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WpMedia {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WpTerm {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub taxonomy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WpAuthor {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// A category record from `GET /categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WpCategory {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: u64,
}

/// A static page record from `GET /pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WpPage {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub modified: Option<String>,
}

/// WordPress error envelope, e.g. `{"code":"rest_no_route","message":"..."}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WpErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Body for `POST /newsletter/subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsletterRequest {
    pub email: String,
}

/// Body for `POST /contact/submit`.
///
/// The plugin accepts arbitrary form fields; the well-known ones are typed
/// and anything else travels through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Response envelope of the newsletter and contact plugin endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PluginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
