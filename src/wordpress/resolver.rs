//! Category slug → WordPress category id.
//!
//! Matching runs an ordered list of predicates and stops at the first hit.
//! When nothing matches against cached categories, resolution is retried
//! once against freshly fetched ones before giving up.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::{Category, CategoryId};
use crate::domain::slug::slug_form;

use super::error::ApiError;
use super::query::CachePolicy;

const SOURCE: &str = "wordpress::resolver";

/// Anything that can list categories under a cache policy.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn categories(&self, policy: CachePolicy) -> Result<Vec<Category>, ApiError>;
}

/// A predicate comparing a category against the requested slug.
pub type Strategy = fn(&Category, &str) -> bool;

/// Priority order matters: earlier strategies are stricter.
pub const STRATEGIES: [(&str, Strategy); 6] = [
    ("exact_slug", exact_slug),
    ("slug_ignore_case", slug_ignore_case),
    ("name_slug_form", name_slug_form),
    ("name_ignore_case", name_ignore_case),
    ("slug_contains", slug_contains),
    ("name_contains", name_contains),
];

fn exact_slug(category: &Category, input: &str) -> bool {
    category.slug == input
}

fn slug_ignore_case(category: &Category, input: &str) -> bool {
    category.slug.to_lowercase() == input.to_lowercase()
}

fn name_slug_form(category: &Category, input: &str) -> bool {
    slug_form(&category.name) == input.to_lowercase()
}

fn name_ignore_case(category: &Category, input: &str) -> bool {
    category.name.to_lowercase() == input.to_lowercase()
}

fn slug_contains(category: &Category, input: &str) -> bool {
    category.slug.to_lowercase().contains(&input.to_lowercase())
}

fn name_contains(category: &Category, input: &str) -> bool {
    category.name.to_lowercase().contains(&input.to_lowercase())
}

/// First category accepted by the highest-priority strategy, with that
/// strategy's name.
pub fn match_category<'a>(
    categories: &'a [Category],
    input: &str,
) -> Option<(&'static str, &'a Category)> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        categories
            .iter()
            .find(|category| strategy(category, input))
            .map(|category| (*name, category))
    })
}

/// Resolve `slug` to a category id, refreshing once on a miss.
pub async fn resolve_slug_to_id<S>(
    source: &S,
    slug: &str,
    policy: CachePolicy,
) -> Result<CategoryId, ApiError>
where
    S: CategorySource + ?Sized,
{
    let input = slug.trim();
    if input.is_empty() {
        return Err(ApiError::invalid("category slug must not be empty"));
    }

    let mut policy = policy;
    loop {
        let categories = source.categories(policy).await?;
        if let Some((strategy, category)) = match_category(&categories, input) {
            debug!(
                target = SOURCE,
                slug = input,
                strategy,
                category_id = category.id,
                "category resolved"
            );
            return Ok(category.id);
        }

        if policy == CachePolicy::UseCache {
            warn!(
                target = SOURCE,
                slug = input,
                "category not found in cached list; retrying with fresh categories"
            );
            policy = CachePolicy::Refresh;
            continue;
        }

        return Err(ApiError::CategoryNotFound {
            slug: input.to_string(),
            available: categories.into_iter().map(|category| category.slug).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn category(id: CategoryId, slug: &str, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            count: 1,
            description: String::new(),
        }
    }

    struct FakeSource {
        cached: Vec<Category>,
        fresh: Vec<Category>,
        calls: Mutex<Vec<CachePolicy>>,
    }

    impl FakeSource {
        fn new(cached: Vec<Category>, fresh: Vec<Category>) -> Self {
            Self {
                cached,
                fresh,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<CachePolicy> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl CategorySource for FakeSource {
        async fn categories(&self, policy: CachePolicy) -> Result<Vec<Category>, ApiError> {
            self.calls.lock().expect("calls lock").push(policy);
            Ok(match policy {
                CachePolicy::UseCache => self.cached.clone(),
                CachePolicy::Refresh => self.fresh.clone(),
            })
        }
    }

    fn aws_and_sql() -> Vec<Category> {
        vec![category(3, "aws", "AWS"), category(8, "sql", "SQL")]
    }

    #[test]
    fn strategies_apply_in_priority_order() {
        let categories = vec![
            category(1, "data-engineering-news", "News"),
            category(2, "data-engineering", "Data Engineering"),
        ];
        // Substring would pick id 1; the exact slug wins first.
        let (strategy, hit) = match_category(&categories, "data-engineering").expect("match");
        assert_eq!(strategy, "exact_slug");
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn wrong_case_matches_via_case_insensitive_slug() {
        let categories = aws_and_sql();
        let (strategy, hit) = match_category(&categories, "AWS").expect("match");
        assert_eq!(strategy, "slug_ignore_case");
        assert_eq!(hit.id, 3);
    }

    #[test]
    fn display_name_strategies() {
        let categories = vec![category(4, "de-101", "Apache Spark")];
        assert_eq!(
            match_category(&categories, "apache-spark").map(|(s, _)| s),
            Some("name_slug_form")
        );
        assert_eq!(
            match_category(&categories, "Apache Spark").map(|(s, _)| s),
            Some("name_ignore_case")
        );
        assert_eq!(
            match_category(&categories, "101").map(|(s, _)| s),
            Some("slug_contains")
        );
        assert_eq!(
            match_category(&categories, "spark").map(|(s, _)| s),
            Some("name_contains")
        );
        assert!(match_category(&categories, "kafka").is_none());
    }

    #[tokio::test]
    async fn resolves_from_cache_without_refresh() {
        let source = FakeSource::new(aws_and_sql(), Vec::new());
        let id = resolve_slug_to_id(&source, "AWS", CachePolicy::UseCache)
            .await
            .expect("resolved");
        assert_eq!(id, 3);
        assert_eq!(source.calls(), vec![CachePolicy::UseCache]);
    }

    #[tokio::test]
    async fn miss_retries_once_with_fresh_categories() {
        let mut fresh = aws_and_sql();
        fresh.push(category(11, "postgres", "PostgreSQL"));
        let source = FakeSource::new(aws_and_sql(), fresh);

        let id = resolve_slug_to_id(&source, "postgres", CachePolicy::UseCache)
            .await
            .expect("resolved after refresh");
        assert_eq!(id, 11);
        assert_eq!(
            source.calls(),
            vec![CachePolicy::UseCache, CachePolicy::Refresh]
        );
    }

    #[tokio::test]
    async fn exhausted_resolution_lists_available_slugs() {
        let source = FakeSource::new(aws_and_sql(), aws_and_sql());
        let err = resolve_slug_to_id(&source, "postgres", CachePolicy::UseCache)
            .await
            .expect_err("not found");
        assert_eq!(
            err,
            ApiError::CategoryNotFound {
                slug: "postgres".into(),
                available: vec!["aws".into(), "sql".into()],
            }
        );
    }

    #[tokio::test]
    async fn refresh_policy_does_not_retry() {
        let source = FakeSource::new(Vec::new(), aws_and_sql());
        let err = resolve_slug_to_id(&source, "postgres", CachePolicy::Refresh)
            .await
            .expect_err("not found");
        assert!(err.is_not_found());
        assert_eq!(source.calls(), vec![CachePolicy::Refresh]);
    }

    #[tokio::test]
    async fn blank_slug_is_rejected_before_fetching() {
        let source = FakeSource::new(aws_and_sql(), aws_and_sql());
        let err = resolve_slug_to_id(&source, "   ", CachePolicy::UseCache)
            .await
            .expect_err("blank");
        assert!(matches!(err, ApiError::InvalidRequest { .. }));
        assert!(source.calls().is_empty());
    }
}
