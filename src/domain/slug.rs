//! Display-name to slug conversion used by category matching.
//!
//! WordPress derives category slugs from names with its own sanitiser. The
//! hub only needs the cheap approximation used by the site's links:
//! lowercase, whitespace runs collapsed to single hyphens.

/// Convert a display name to slug form (`"Data Engineering"` →
/// `"data-engineering"`).
pub fn slug_form(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
