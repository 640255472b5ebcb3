//! Raw WordPress records → normalized entities.
//!
//! Everything here is pure: no I/O, no clocks, no shared state. The same raw
//! record always yields the same normalized value.

use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use hub_wp_types::{WpCategory, WpEmbedded, WpPage, WpPost};
use once_cell::sync::Lazy;
use serde_json::Value;

use super::entities::{Category, Page, Post};

/// Shown when a post has no usable featured media.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&h=400&fit=crop";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";
pub const DEFAULT_AUTHOR: &str = "DataEngineer Hub";
pub const WORDS_PER_MINUTE: usize = 200;

const CATEGORY_TAXONOMY: &str = "category";
const TAG_TAXONOMY: &str = "post_tag";

// No allowed tags: every element is unwrapped to its text, and the contents
// of script/style are dropped entirely.
static TEXT_ONLY: Lazy<AmmoniaBuilder<'static>> = Lazy::new(|| {
    let mut builder = AmmoniaBuilder::default();
    builder.tags(HashSet::new());
    builder
});

pub fn normalize_post(raw: &WpPost) -> Post {
    let embedded = raw.embedded.as_ref();
    let (category, category_slug) = primary_category(embedded);

    Post {
        id: raw.id,
        slug: raw.slug.clone(),
        title: strip_html(&raw.title.rendered),
        excerpt: strip_html(&raw.excerpt.rendered),
        content: raw.content.rendered.clone(),
        category,
        category_slug,
        tags: tag_names(embedded),
        read_time: read_time(&raw.content.rendered),
        date: raw.date.clone(),
        modified: raw.modified.clone(),
        image: featured_image(embedded),
        featured: flag(raw, "featured"),
        trending: flag(raw, "trending"),
        author: author_name(embedded),
    }
}

pub fn normalize_category(raw: &WpCategory) -> Category {
    Category {
        id: raw.id,
        name: strip_html(&raw.name),
        slug: raw.slug.clone(),
        count: raw.count,
        description: strip_html(&raw.description),
    }
}

pub fn normalize_page(raw: &WpPage) -> Page {
    Page {
        id: raw.id,
        slug: raw.slug.clone(),
        title: strip_html(&raw.title.rendered),
        content: raw.content.rendered.clone(),
        modified: raw.modified.clone(),
    }
}

/// `"N min read"` at [`WORDS_PER_MINUTE`], rounded up.
///
/// An empty body reports `"0 min read"`; any non-empty body reports at
/// least one minute.
pub fn read_time(content_html: &str) -> String {
    let words = strip_html(content_html).split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    format!("{minutes} min read")
}

/// Remove tags, decode entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = TEXT_ONLY.clean(html).to_string();
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode named and numeric character references.
///
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        // references are short; never scan past the longest name
        let terminator = candidate[1..]
            .char_indices()
            .take(11)
            .find(|(_, ch)| *ch == ';')
            .map(|(index, _)| index);
        match terminator {
            Some(end) if end > 0 && end <= 10 => {
                let name = &candidate[1..=end];
                if let Some(ch) = decode_reference(name) {
                    out.push(ch);
                    rest = &candidate[end + 2..];
                    continue;
                }
                out.push('&');
                rest = &candidate[1..];
            }
            _ => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "copy" => '\u{00A9}',
        _ => return None,
    };
    Some(ch)
}

fn featured_image(embedded: Option<&WpEmbedded>) -> String {
    embedded
        .and_then(|embedded| embedded.featured_media.first())
        .and_then(|media| media.source_url.as_deref())
        .filter(|url| !url.trim().is_empty())
        .map_or_else(|| FALLBACK_IMAGE.to_string(), str::to_string)
}

/// First attached category that is not the default bucket, else the
/// default bucket.
fn primary_category(embedded: Option<&WpEmbedded>) -> (String, String) {
    let categories: Vec<_> = embedded
        .map(|embedded| {
            embedded
                .terms
                .iter()
                .flatten()
                .filter(|term| term.taxonomy == CATEGORY_TAXONOMY)
                .collect()
        })
        .unwrap_or_default();

    categories
        .iter()
        .find(|term| !term.name.eq_ignore_ascii_case(UNCATEGORIZED))
        .map(|term| (strip_html(&term.name), term.slug.clone()))
        .unwrap_or_else(|| (UNCATEGORIZED.to_string(), UNCATEGORIZED_SLUG.to_string()))
}

fn tag_names(embedded: Option<&WpEmbedded>) -> Vec<String> {
    embedded
        .map(|embedded| {
            embedded
                .terms
                .iter()
                .flatten()
                .filter(|term| term.taxonomy == TAG_TAXONOMY)
                .map(|term| strip_html(&term.name))
                .collect()
        })
        .unwrap_or_default()
}

fn author_name(embedded: Option<&WpEmbedded>) -> String {
    embedded
        .and_then(|embedded| embedded.author.first())
        .map(|author| author.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string()
}

/// Registered meta first, then ACF custom fields, then `false`. The first
/// tier that defines the field wins, even when it defines it as false.
fn flag(raw: &WpPost, field: &str) -> bool {
    [raw.meta.as_ref(), raw.acf.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|block| block.get(field).and_then(truthy))
        .unwrap_or(false)
}

/// Interpret a custom-field value as a boolean. `None` means "not defined".
fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) => {
            let normalized = text.trim().to_ascii_lowercase();
            Some(!matches!(
                normalized.as_str(),
                "" | "0" | "false" | "no" | "off"
            ))
        }
        Value::Array(items) => items.first().and_then(truthy),
    }
}

#[cfg(test)]
mod tests {
    use hub_wp_types::{Rendered, WpAuthor, WpMedia, WpTerm};
    use serde_json::json;

    use super::*;

    fn term(name: &str, slug: &str, taxonomy: &str) -> WpTerm {
        WpTerm {
            id: 1,
            name: name.into(),
            slug: slug.into(),
            taxonomy: taxonomy.into(),
        }
    }

    fn raw_post() -> WpPost {
        WpPost {
            id: 11,
            slug: "spark-tuning".into(),
            date: "2024-05-01T09:00:00".into(),
            modified: Some("2024-05-02T10:00:00".into()),
            title: Rendered::new("Spark &amp; Delta: What&#8217;s New"),
            excerpt: Rendered::new("<p>Tuning <strong>Spark</strong> jobs [&hellip;]</p>\n"),
            content: Rendered::new("<p>one two three</p>"),
            categories: vec![1, 5],
            meta: None,
            acf: None,
            embedded: Some(WpEmbedded {
                featured_media: vec![WpMedia {
                    source_url: Some("https://cdn.example.com/spark.png".into()),
                    alt_text: None,
                }],
                terms: vec![
                    vec![
                        term("Uncategorized", "uncategorized", "category"),
                        term("Apache Spark", "apache-spark", "category"),
                    ],
                    vec![term("performance", "performance", "post_tag")],
                ],
                author: vec![WpAuthor {
                    id: 3,
                    name: "Sreekanth".into(),
                }],
            }),
        }
    }

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    #[test]
    fn normalizes_embedded_fields() {
        let post = normalize_post(&raw_post());

        assert_eq!(post.title, "Spark & Delta: What\u{2019}s New");
        assert_eq!(post.excerpt, "Tuning Spark jobs [\u{2026}]");
        assert_eq!(post.content, "<p>one two three</p>");
        assert_eq!(post.category, "Apache Spark");
        assert_eq!(post.category_slug, "apache-spark");
        assert_eq!(post.tags, vec!["performance".to_string()]);
        assert_eq!(post.image, "https://cdn.example.com/spark.png");
        assert_eq!(post.author, "Sreekanth");
        assert_eq!(post.read_time, "1 min read");
        assert!(!post.featured);
        assert!(!post.trending);
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = raw_post();
        assert_eq!(normalize_post(&raw), normalize_post(&raw));
    }

    #[test]
    fn missing_media_uses_fallback_image() {
        let mut raw = raw_post();
        raw.embedded = None;
        let post = normalize_post(&raw);

        assert_eq!(post.image, FALLBACK_IMAGE);
        assert_eq!(post.category, UNCATEGORIZED);
        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert!(post.tags.is_empty());
    }

    #[test]
    fn media_error_object_uses_fallback_image() {
        let mut raw = raw_post();
        if let Some(embedded) = raw.embedded.as_mut() {
            embedded.featured_media = vec![WpMedia::default()];
        }
        assert_eq!(normalize_post(&raw).image, FALLBACK_IMAGE);
    }

    #[test]
    fn only_uncategorized_falls_back_to_uncategorized() {
        let mut raw = raw_post();
        if let Some(embedded) = raw.embedded.as_mut() {
            embedded.terms = vec![vec![term("Uncategorized", "uncategorized", "category")]];
        }
        let post = normalize_post(&raw);
        assert_eq!(post.category, UNCATEGORIZED);
        assert_eq!(post.category_slug, UNCATEGORIZED_SLUG);
    }

    #[test]
    fn single_category_is_used_directly() {
        let mut raw = raw_post();
        if let Some(embedded) = raw.embedded.as_mut() {
            embedded.terms = vec![vec![term("SQL", "sql", "category")]];
        }
        assert_eq!(normalize_post(&raw).category, "SQL");
    }

    #[test]
    fn read_time_edges() {
        assert_eq!(read_time(""), "0 min read");
        assert_eq!(read_time("<p></p>"), "0 min read");
        assert_eq!(read_time("word"), "1 min read");
        assert_eq!(read_time(&words(200)), "1 min read");
        assert_eq!(read_time(&words(201)), "2 min read");
        assert_eq!(read_time(&format!("<p>{}</p>", words(400))), "2 min read");
    }

    #[test]
    fn meta_tier_wins_over_acf() {
        let mut raw = raw_post();
        raw.meta = Some(json!({ "featured": false, "trending": "1" }));
        raw.acf = Some(json!({ "featured": true, "trending": false }));

        let post = normalize_post(&raw);
        assert!(!post.featured);
        assert!(post.trending);
    }

    #[test]
    fn acf_tier_used_when_meta_undefined() {
        let mut raw = raw_post();
        raw.meta = Some(json!([]));
        raw.acf = Some(json!({ "featured": 1, "trending": null }));

        let post = normalize_post(&raw);
        assert!(post.featured);
        assert!(!post.trending);
    }

    #[test]
    fn acf_false_block_is_ignored() {
        let mut raw = raw_post();
        raw.acf = Some(Value::Bool(false));
        assert!(!normalize_post(&raw).featured);
    }

    #[test]
    fn strip_html_drops_scripts_and_collapses_whitespace() {
        let html = "<p>Hello\n <em>data</em>&nbsp;engineers</p><script>alert(1)</script>";
        assert_eq!(strip_html(html), "Hello data engineers");
    }

    #[test]
    fn decode_entities_only_looks_near_the_ampersand() {
        let body = "R&D ".repeat(20_000);
        assert_eq!(decode_entities(&body), body);

        let far = format!("&amp{};", "x".repeat(40));
        assert_eq!(decode_entities(&far), far);
        assert_eq!(decode_entities("&hellip;&amp;"), "\u{2026}&");
    }

    #[test]
    fn decode_entities_handles_numeric_and_unknown() {
        assert_eq!(decode_entities("a &#38; b &#x41; &bogus; &"), "a & b A &bogus; &");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn category_names_are_decoded() {
        let raw = WpCategory {
            id: 4,
            name: "ML &amp; AI".into(),
            slug: "ml-ai".into(),
            count: 3,
            description: "<p>Models</p>".into(),
            parent: 0,
        };
        let category = normalize_category(&raw);
        assert_eq!(category.name, "ML & AI");
        assert_eq!(category.description, "Models");
        assert!(category.has_posts());
    }

    #[test]
    fn page_keeps_raw_content() {
        let raw = WpPage {
            id: 2,
            slug: "privacy-policy".into(),
            title: Rendered::new("Privacy &amp; Cookies"),
            content: Rendered::new("<h2>Data</h2>"),
            modified: None,
        };
        let page = normalize_page(&raw);
        assert_eq!(page.title, "Privacy & Cookies");
        assert_eq!(page.content, "<h2>Data</h2>");
    }
}
