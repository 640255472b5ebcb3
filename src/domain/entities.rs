//! Normalized entities handed to the UI layer.
//!
//! These are derived from raw WordPress records on every fetch and never
//! persisted. Field names serialize in camelCase because the rendering
//! layer consumes them as JSON.

use serde::Serialize;

pub type CategoryId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub slug: String,
    /// Plain-text title with entities decoded.
    pub title: String,
    /// Plain-text excerpt, tags stripped.
    pub excerpt: String,
    /// Rendered body, kept as raw HTML.
    pub content: String,
    /// Display name of the primary category.
    pub category: String,
    pub category_slug: String,
    pub tags: Vec<String>,
    /// `"N min read"`.
    pub read_time: String,
    pub date: String,
    pub modified: Option<String>,
    pub image: String,
    pub featured: bool,
    pub trending: bool,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// Number of published posts; authoritative for "has posts" filtering.
    pub count: u64,
    pub description: String,
}

impl Category {
    pub fn has_posts(&self) -> bool {
        self.count > 0
    }
}

/// A static page such as the privacy policy or terms of service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub modified: Option<String>,
}

/// One page of posts plus the totals WordPress reports in its headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_pages: u32,
    pub total_posts: u64,
}
