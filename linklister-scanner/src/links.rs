//! Outbound link extraction scoped to a content container.

use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScanError};

pub type LinkSet = BTreeSet<String>;

/// Which links on a page are in scope.
#[derive(Debug, Clone)]
pub struct LinkScope {
    /// Path prefix a link must start with, e.g. `/blog/`.
    pub subdirectory: String,
    /// The feed itself is never reported as a link.
    pub feed_url: String,
    /// Only anchors under elements carrying this class are considered.
    pub container_class: String,
}

impl LinkScope {
    pub fn new(
        subdirectory: impl Into<String>,
        feed_url: impl Into<String>,
        container_class: impl Into<String>,
    ) -> Self {
        Self {
            subdirectory: subdirectory.into(),
            feed_url: feed_url.into(),
            container_class: container_class.into(),
        }
    }
}

/// Select every element whose class list contains `class`.
///
/// Membership is checked on the parsed class list, so tokens that are not
/// valid CSS identifiers (`md:prose`, `2col`) still match.
pub fn select_containers<'a>(document: &'a Html, class: &str) -> Result<Vec<ElementRef<'a>>> {
    let class = class.trim();
    if class.is_empty() || class.contains(char::is_whitespace) {
        return Err(ScanError::ParseError(format!(
            "Invalid container class '{}'",
            class
        )));
    }

    let selector = Selector::parse("[class]").unwrap();
    Ok(document
        .select(&selector)
        .filter(|element| element.value().classes().any(|c| c == class))
        .collect())
}

/// Parse and re-serialize a URL without its fragment, so feed URLs and
/// extracted links share one spelling. Unparseable input is kept as is.
pub fn canonical_url(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Extract the in-scope links of one page.
///
/// The result never contains the page itself or the feed URL, and every
/// entry is fragment-free.
pub fn extract_links(html: &str, page_url: &str, scope: &LinkScope) -> Result<LinkSet> {
    let base_url = Url::parse(page_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", page_url, e)))?;

    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut links = LinkSet::new();

    for container in select_containers(&document, &scope.container_class)? {
        for element in container.select(&link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(absolute_url) = resolve_url(&base_url, href) else {
                continue;
            };

            if !absolute_url.path().starts_with(&scope.subdirectory) {
                debug!("  -> {} outside {}, skipping", absolute_url, scope.subdirectory);
                continue;
            }
            if is_same_url(&absolute_url, &scope.feed_url) {
                debug!("  -> {} is the feed, skipping", absolute_url);
                continue;
            }
            if is_same_url(&absolute_url, page_url) {
                continue;
            }

            links.insert(absolute_url.to_string());
        }
    }

    debug!("Found {} links on {}", links.len(), page_url);
    Ok(links)
}

/// Resolve `href` against the page and drop its fragment.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// Exact comparison against a URL string as given, or as the url crate
/// serializes it once the fragment is gone.
fn is_same_url(url: &Url, other: &str) -> bool {
    if url.as_str() == other {
        return true;
    }

    match Url::parse(other) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed == *url
        }
        Err(_) => false,
    }
}
