//! Anchor extraction and link resolution
//!
//! The agent hands over the DOM serialized after the settle delay; this
//! module pulls the raw `a[href]` values out of it and resolves each one
//! against the crawl target. Resolution is deliberately narrow: the tool
//! mirrors one site, so anything that is not root-relative and does not
//! contain the target substring is discarded without comment.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Collects the raw href attribute of every anchor in the document.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

/// Resolves one raw href against the crawl target
///
/// * root-relative (`/a/b`) - glued onto the target
/// * contains the target substring - kept as-is
/// * anything else (empty, out-of-domain, other schemes) - discarded
pub fn resolve_href(target: &str, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with('/') {
        return Some(format!("{}{}", target, href));
    }

    if href.contains(target) {
        return Some(href.to_string());
    }

    None
}

/// Extracts the deduplicated in-scope link set of a rendered page.
pub fn page_links(target: &str, html: &str) -> HashSet<String> {
    extract_hrefs(html)
        .iter()
        .filter_map(|href| resolve_href(target, href))
        .collect()
}
