//! Link collection from search-result pages
//!
//! A results page lists its documents in one of several layouts. The selector
//! chain below goes from the most specific layout to a generic "any document
//! link" pattern; the first selector that matches anything decides the result,
//! later ones are never merged in.

use crate::config::ArchiveConfig;
use crate::crawler::extractor::FallbackChain;
use crate::render::{Element, Query, RenderResult, Renderer};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Item-link selectors, most specific first
pub const LINK_SELECTORS: &[&str] = &[
    "td.document.contextual-region a",
    "td.document a",
    ".views-row a[href*='/document/']",
    "a[href*='/document/']",
];

/// Length of the content preview logged when a page has no item links
pub const PREVIEW_CHARS: usize = 1000;

/// Collects the item links listed on one results page
#[derive(Debug, Clone)]
pub struct LinkCollector {
    base_url: Url,
    archive: ArchiveConfig,
    settle: Duration,
}

impl LinkCollector {
    /// Creates a collector for `archive`, pausing `settle` after each navigation
    pub fn new(archive: &ArchiveConfig, settle: Duration) -> crate::Result<Self> {
        Ok(Self {
            base_url: Url::parse(&archive.base_url)?,
            archive: archive.clone(),
            settle,
        })
    }

    /// Address of results page `page_number`
    pub fn page_url(&self, page_number: u32) -> String {
        self.archive.page_url(page_number)
    }

    /// Navigates to a results page and returns its item links
    ///
    /// Navigation failures propagate. Finding no links is not an error: the
    /// list comes back empty and the start of the page content is logged.
    pub async fn collect<R: Renderer>(
        &self,
        renderer: &mut R,
        page_number: u32,
    ) -> RenderResult<Vec<String>> {
        let url = self.page_url(page_number);
        tracing::info!("Loading results page {}: {}", page_number, url);

        renderer.navigate(&url).await?;
        tokio::time::sleep(self.settle).await;

        let links = self.links_in(&*renderer);
        if links.is_empty() {
            tracing::warn!("No document links found on page {}", page_number);
            tracing::warn!(
                "Page {} content preview:\n{}",
                page_number,
                renderer.content_preview(PREVIEW_CHARS)
            );
        } else {
            tracing::info!("Found {} document links on page {}", links.len(), page_number);
        }

        Ok(links)
    }

    /// Item links in `doc`, absolute, deduplicated, in page order
    pub fn links_in(&self, doc: &dyn Query) -> Vec<String> {
        let chain = LINK_SELECTORS
            .iter()
            .fold(FallbackChain::new(), |chain, selector| {
                let selector = *selector;
                chain.then(selector, move |d: &dyn Query| Ok(matching(d, selector)))
            });

        let anchors = match chain.evaluate(doc) {
            Ok(anchors) => anchors.unwrap_or_default(),
            Err(e) => {
                tracing::debug!("Link selector chain failed: {}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter_map(|anchor| anchor.attribute("href"))
            .filter_map(|href| resolve_link(href, &self.base_url))
            .filter(|url| url.contains(&self.archive.item_path))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}

/// Elements matched by `selector`, or `None` when it matches nothing or fails
///
/// A failing selector only disqualifies itself; the chain moves on.
fn matching(doc: &dyn Query, selector: &str) -> Option<Vec<Element>> {
    match doc.query(selector) {
        Ok(found) if !found.is_empty() => {
            tracing::debug!("Selector '{}' matched {} links", selector, found.len());
            Some(found)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Selector '{}' failed: {}", selector, e);
            None
        }
    }
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None for:
/// - javascript:, mailto:, tel: and data: links
/// - fragment-only links
/// - hrefs that do not resolve against the base
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::debug!("Failed to resolve link '{}': {}", href, e);
            None
        }
    }
}
