use std::collections::BTreeMap;

use crate::cache::RequestSignature;
use crate::domain::entities::CategoryId;

pub const POSTS_ENDPOINT: &str = "posts";
pub const CATEGORIES_ENDPOINT: &str = "categories";
pub const PAGES_ENDPOINT: &str = "pages";
pub const NEWSLETTER_ENDPOINT: &str = "newsletter/subscribe";
pub const CONTACT_ENDPOINT: &str = "contact/submit";

/// WordPress caps `per_page` at 100.
pub const MAX_PER_PAGE: u32 = 100;

/// Whether a read may be served from the response store.
///
/// `Refresh` bypasses the store for this call only; the fresh result is
/// still written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    #[default]
    UseCache,
    Refresh,
}

impl CachePolicy {
    pub fn from_refresh(refresh: bool) -> Self {
        if refresh { Self::Refresh } else { Self::UseCache }
    }

    pub fn reads_cache(self) -> bool {
        matches!(self, Self::UseCache)
    }
}

/// Filters for `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// 1-based page number; `None` means the first page.
    pub page: Option<u32>,
    /// Falls back to the configured default when `None`.
    pub per_page: Option<u32>,
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

impl PostQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Query parameters sent to WordPress, always embedding media and terms.
    pub fn params(&self, default_per_page: u32) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("_embed", "true".to_string());
        params.insert("page", self.page.unwrap_or(1).max(1).to_string());
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        params.insert("per_page", per_page.to_string());
        if let Some(category) = self.category {
            params.insert("categories", category.to_string());
        }
        if let Some(search) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            params.insert("search", search.to_string());
        }
        params
    }
}

pub(crate) fn signature(endpoint: &str, params: &BTreeMap<&'static str, String>) -> RequestSignature {
    RequestSignature::new(
        endpoint,
        params.iter().map(|(key, value)| (*key, value.as_str())),
    )
}
