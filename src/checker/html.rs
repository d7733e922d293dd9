// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML fragments.
//
// The Reddit API hands us descriptions as *entity-escaped* HTML, e.g.
//   &lt;a href="https://example.com?a=1&amp;amp;b=2"&gt;docs&lt;/a&gt;
// so we decode the entities first (html-escape) and only then parse the
// result into a DOM with `scraper`.
//
// Only absolute http:// and https:// links are kept. We do NOT resolve
// relative links here: a rule description has no base URL to resolve against.
//
// Rust concepts:
// - Iterators and closures: filter_map / filter over selected elements
// - LazyLock: a constant selector parsed once on first use
// =============================================================================

use scraper::{Html, Selector};
use std::sync::LazyLock;

// All <a> tags that carry an href attribute.
// The selector is a constant known to be valid, so parsing it cannot fail.
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

// Extracts all absolute HTTP/HTTPS links from an HTML fragment
//
// Parameters:
//   html: the (possibly entity-escaped) HTML to scan
//
// Returns: Vec<String> of hrefs in document order, duplicates included
//
// Example:
//   html = "&lt;a href=\"https://www.rust-lang.org\"&gt;Rust&lt;/a&gt;"
//   result = ["https://www.rust-lang.org"]
pub fn extract_urls(html: &str) -> Vec<String> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let decoded = html_escape::decode_html_entities(html);

    // html5ever never fails: malformed markup is repaired, not rejected
    let fragment = Html::parse_fragment(&decoded);

    fragment
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_checkable_link(href))
        .map(str::to_string)
        .collect()
}

// Checks if an href is an absolute http(s) URL
//
// The scheme comparison is case-insensitive ("HTTPS://" counts).
// We skip mailto:, tel:, javascript:, fragment-only (#top) and relative links.
fn is_checkable_link(href: &str) -> bool {
    has_prefix_ignore_case(href, "http://") || has_prefix_ignore_case(href, "https://")
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
