//! `ApiClient`: the data-access facade handed to UI collaborators.
//!
//! A client owns its response store, coalescing registry and transport.
//! Clones share all three, so construct one per process and pass clones
//! around.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use hub_wp_types::{ContactRequest, NewsletterRequest, PluginResponse, WpCategory, WpPage, WpPost};
use tracing::{debug, error};

use crate::cache::{CacheConfig, RequestCoalescer, RequestSignature, ResponseStore};
use crate::config::{ApiSettings, Settings};
use crate::domain::entities::{Category, CategoryId, Page, Post, PostPage};
use crate::domain::transform::{normalize_category, normalize_page, normalize_post};

use super::error::ApiError;
use super::query::{
    CATEGORIES_ENDPOINT, CONTACT_ENDPOINT, CachePolicy, MAX_PER_PAGE, NEWSLETTER_ENDPOINT,
    PAGES_ENDPOINT, POSTS_ENDPOINT, PostQuery, signature,
};
use super::resolver::{CategorySource, resolve_slug_to_id};
use super::transport::{Transport, normalize_base};

const SOURCE: &str = "wordpress::client";

/// Normalized payloads as they sit in the response store.
#[derive(Debug, Clone)]
enum Cached {
    Posts(PostPage),
    Post(Post),
    Categories(Vec<Category>),
    Page(Page),
}

struct ClientInner {
    transport: Transport,
    store: ResponseStore<Cached>,
    coalescer: RequestCoalescer<Cached>,
    cache_enabled: bool,
    default_per_page: u32,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(api: &ApiSettings, cache: &CacheConfig) -> Result<Self, ApiError> {
        let transport = Transport::new(api.base_url.as_str(), api.timeout)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                store: ResponseStore::new(cache),
                coalescer: RequestCoalescer::new(),
                cache_enabled: cache.enabled,
                default_per_page: api.default_per_page.clamp(1, MAX_PER_PAGE),
            }),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.api, &settings.cache)
    }

    /// Client with default timeouts and cache settings.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let api = ApiSettings::with_base_url(normalize_base(base_url)?);
        Self::new(&api, &CacheConfig::default())
    }

    /// Paginated, normalized posts.
    pub async fn get_posts(
        &self,
        query: &PostQuery,
        policy: CachePolicy,
    ) -> Result<PostPage, ApiError> {
        let params = query.params(self.inner.default_per_page);
        let key = signature(POSTS_ENDPOINT, &params);

        let outcome = self
            .cached(&key, policy, move |inner| async move {
                let (raw, pagination) = inner
                    .transport
                    .get::<Vec<WpPost>>(POSTS_ENDPOINT, &params)
                    .await?;
                Ok(Cached::Posts(PostPage {
                    posts: raw.iter().map(normalize_post).collect(),
                    total_pages: pagination.total_pages,
                    total_posts: pagination.total,
                }))
            })
            .await
            .and_then(|cached| match cached {
                Cached::Posts(page) => Ok(page),
                other => Err(shape_mismatch(&key, &other)),
            });
        logged("get_posts", outcome)
    }

    /// A single post, or `NotFound` when WordPress returns an empty array.
    pub async fn get_post_by_slug(&self, slug: &str, policy: CachePolicy) -> Result<Post, ApiError> {
        let outcome = self.post_by_slug(slug, policy).await;
        logged("get_post_by_slug", outcome)
    }

    async fn post_by_slug(&self, slug: &str, policy: CachePolicy) -> Result<Post, ApiError> {
        let slug = require_slug(slug, "post")?;
        let mut params = BTreeMap::new();
        params.insert("slug", slug.clone());
        params.insert("_embed", "true".to_string());
        let key = signature(POSTS_ENDPOINT, &params);

        self.cached(&key, policy, move |inner| async move {
            let (raw, _) = inner
                .transport
                .get::<Vec<WpPost>>(POSTS_ENDPOINT, &params)
                .await?;
            raw.first()
                .map(|post| Cached::Post(normalize_post(post)))
                .ok_or(ApiError::NotFound {
                    resource: "post",
                    slug,
                })
        })
        .await
        .and_then(|cached| match cached {
            Cached::Post(post) => Ok(post),
            other => Err(shape_mismatch(&key, &other)),
        })
    }

    /// Every category (first 100), in WordPress order.
    pub async fn get_categories(&self, policy: CachePolicy) -> Result<Vec<Category>, ApiError> {
        let outcome = self.categories_list(policy).await;
        logged("get_categories", outcome)
    }

    async fn categories_list(&self, policy: CachePolicy) -> Result<Vec<Category>, ApiError> {
        let mut params = BTreeMap::new();
        params.insert("per_page", MAX_PER_PAGE.to_string());
        let key = signature(CATEGORIES_ENDPOINT, &params);

        self.cached(&key, policy, move |inner| async move {
            let (raw, _) = inner
                .transport
                .get::<Vec<WpCategory>>(CATEGORIES_ENDPOINT, &params)
                .await?;
            Ok(Cached::Categories(
                raw.iter().map(normalize_category).collect(),
            ))
        })
        .await
        .and_then(|cached| match cached {
            Cached::Categories(categories) => Ok(categories),
            other => Err(shape_mismatch(&key, &other)),
        })
    }

    /// Categories that have at least one published post.
    pub async fn get_categories_with_posts(
        &self,
        policy: CachePolicy,
    ) -> Result<Vec<Category>, ApiError> {
        let categories = self.get_categories(policy).await?;
        Ok(categories
            .into_iter()
            .filter(Category::has_posts)
            .collect())
    }

    pub async fn get_category_id_by_slug(
        &self,
        slug: &str,
        policy: CachePolicy,
    ) -> Result<CategoryId, ApiError> {
        let outcome = resolve_slug_to_id(self, slug, policy).await;
        logged("get_category_id_by_slug", outcome)
    }

    /// Posts in the category named by `slug`; the slug goes through the
    /// category resolver first.
    pub async fn get_posts_by_category(
        &self,
        slug: &str,
        query: &PostQuery,
        policy: CachePolicy,
    ) -> Result<PostPage, ApiError> {
        let category = self.get_category_id_by_slug(slug, policy).await?;
        self.get_posts(&query.clone().category(category), policy)
            .await
    }

    pub async fn get_featured_posts(
        &self,
        limit: usize,
        policy: CachePolicy,
    ) -> Result<Vec<Post>, ApiError> {
        self.flagged_posts(limit, policy, |post| post.featured).await
    }

    pub async fn get_trending_posts(
        &self,
        limit: usize,
        policy: CachePolicy,
    ) -> Result<Vec<Post>, ApiError> {
        self.flagged_posts(limit, policy, |post| post.trending).await
    }

    async fn flagged_posts(
        &self,
        limit: usize,
        policy: CachePolicy,
        keep: fn(&Post) -> bool,
    ) -> Result<Vec<Post>, ApiError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let wanted = u32::try_from(limit).unwrap_or(MAX_PER_PAGE);
        let per_page = wanted.max(self.inner.default_per_page).min(MAX_PER_PAGE);
        let page = self
            .get_posts(&PostQuery::default().per_page(per_page), policy)
            .await?;
        let mut posts: Vec<Post> = page.posts.into_iter().filter(|post| keep(post)).collect();
        posts.truncate(limit);
        Ok(posts)
    }

    /// Full-text search; blank terms are rejected.
    pub async fn search_posts(
        &self,
        term: &str,
        page: u32,
        policy: CachePolicy,
    ) -> Result<PostPage, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return logged(
                "search_posts",
                Err(ApiError::invalid("search term must not be empty")),
            );
        }
        self.get_posts(&PostQuery::default().page(page).search(term), policy)
            .await
    }

    /// Static page such as the privacy policy.
    pub async fn get_page_by_slug(&self, slug: &str, policy: CachePolicy) -> Result<Page, ApiError> {
        let outcome = self.page_by_slug(slug, policy).await;
        logged("get_page_by_slug", outcome)
    }

    async fn page_by_slug(&self, slug: &str, policy: CachePolicy) -> Result<Page, ApiError> {
        let slug = require_slug(slug, "page")?;
        let mut params = BTreeMap::new();
        params.insert("slug", slug.clone());
        let key = signature(PAGES_ENDPOINT, &params);

        self.cached(&key, policy, move |inner| async move {
            let (raw, _) = inner
                .transport
                .get::<Vec<WpPage>>(PAGES_ENDPOINT, &params)
                .await?;
            raw.first()
                .map(|page| Cached::Page(normalize_page(page)))
                .ok_or(ApiError::NotFound {
                    resource: "page",
                    slug,
                })
        })
        .await
        .and_then(|cached| match cached {
            Cached::Page(page) => Ok(page),
            other => Err(shape_mismatch(&key, &other)),
        })
    }

    /// Drop cached responses whose signature contains `pattern`, or all of
    /// them. Returns the number of entries removed.
    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        self.inner.store.invalidate(pattern)
    }

    pub fn cache_len(&self) -> usize {
        self.inner.store.len()
    }

    pub async fn subscribe_newsletter(&self, email: &str) -> Result<PluginResponse, ApiError> {
        let email = email.trim();
        let outcome = if email.is_empty() || !email.contains('@') {
            Err(ApiError::invalid(format!("`{email}` is not an email address")))
        } else {
            let body = NewsletterRequest {
                email: email.to_string(),
            };
            self.inner.transport.post(NEWSLETTER_ENDPOINT, &body).await
        };
        logged("subscribe_newsletter", outcome)
    }

    pub async fn submit_contact_form(
        &self,
        form: &ContactRequest,
    ) -> Result<PluginResponse, ApiError> {
        let outcome = if form.name.trim().is_empty() || form.message.trim().is_empty() {
            Err(ApiError::invalid("contact form needs a name and a message"))
        } else {
            self.inner.transport.post(CONTACT_ENDPOINT, form).await
        };
        logged("submit_contact_form", outcome)
    }

    /// Serve `key` from the store when allowed, otherwise join or start the
    /// single in-flight fetch for it.
    async fn cached<F, Fut>(
        &self,
        key: &RequestSignature,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<Cached, ApiError>
    where
        F: FnOnce(Arc<ClientInner>) -> Fut,
        Fut: Future<Output = Result<Cached, ApiError>> + Send + 'static,
    {
        let inner = &self.inner;
        let read_cache = inner.cache_enabled && policy.reads_cache();
        let write_cache = inner.cache_enabled;
        debug!(target = SOURCE, key = %key, ?policy, read_cache, "wordpress read");

        let probe = || {
            if read_cache {
                inner.store.get_fresh(key.as_str())
            } else {
                None
            }
        };
        let factory = || {
            let owned = Arc::clone(inner);
            let store_key = key.to_string();
            let fetching = fetch(Arc::clone(&owned));
            async move {
                let value = fetching.await?;
                if write_cache {
                    owned.store.put(store_key, value.clone());
                }
                Ok(value)
            }
        };

        inner
            .coalescer
            .dedupe_or_probe(key.as_str(), probe, factory)
            .await
    }
}

#[async_trait]
impl CategorySource for ApiClient {
    async fn categories(&self, policy: CachePolicy) -> Result<Vec<Category>, ApiError> {
        self.get_categories(policy).await
    }
}

fn require_slug(slug: &str, resource: &'static str) -> Result<String, ApiError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(ApiError::invalid(format!("{resource} slug must not be empty")));
    }
    Ok(slug.to_string())
}

fn shape_mismatch(key: &RequestSignature, cached: &Cached) -> ApiError {
    ApiError::decode(format!("cached payload for `{key}` has unexpected shape: {cached:?}"))
}

fn logged<T>(operation: &'static str, outcome: Result<T, ApiError>) -> Result<T, ApiError> {
    outcome.inspect_err(|err| {
        error!(
            target = SOURCE,
            operation,
            kind = err.kind(),
            not_found = err.is_not_found(),
            transient = err.is_transient(),
            error = %err,
            "wordpress operation failed"
        );
    })
}
