use crate::error::ScanError;
use crate::normalize::NormalizedUrl;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

/// Schemes that never point at a fetchable web page.
const SKIPPED_PREFIXES: [&str; 4] = ["javascript:", "mailto:", "tel:", "ftp:"];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Raw `href` values of every anchor, in document order.
pub fn scan_anchors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Resolve a single href against `base`.
///
/// `Ok(None)` means the href was intentionally skipped (empty or a
/// non-web scheme); `Err` means it could not be resolved.
pub fn resolve_href(base: &Url, href: &str) -> Result<Option<NormalizedUrl>, ScanError> {
    let href = href.trim();
    if href.is_empty() || SKIPPED_PREFIXES.iter().any(|p| href.starts_with(p)) {
        return Ok(None);
    }

    base.join(href)
        .map(|resolved| Some(NormalizedUrl::from(resolved)))
        .map_err(|e| ScanError::ParseError(format!("{}: {}", href, e)))
}

/// Absolute, fragment-free links of a page in document order.
///
/// Duplicates are kept; deduplication belongs to the crawler.
pub fn extract_links(html: &str, base: &Url) -> Vec<NormalizedUrl> {
    let mut links = Vec::new();

    for href in scan_anchors(html) {
        match resolve_href(base, &href) {
            Ok(Some(link)) => links.push(link),
            Ok(None) => {}
            Err(e) => warn!("Invalid URL found on page '{}': {}", base, e),
        }
    }

    links
}
