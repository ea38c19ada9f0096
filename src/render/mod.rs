//! Renderer capability
//!
//! The crawler never talks to a browser or HTTP client directly. It needs three
//! things from whatever produces documents:
//! - navigate to an address
//! - run a CSS query against the current document, getting element snapshots back
//! - show a short preview of the raw content for diagnostics
//!
//! `HttpRenderer` provides this over plain HTTP with `scraper` doing the
//! querying. Anything that can execute scripts could sit behind the same trait.

mod document;
mod http;
mod session;

pub use document::HtmlDocument;
pub use http::{build_http_client, HttpRenderer};
pub use session::RendererSession;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation to {url} failed: {source}")]
    Navigation { url: String, source: reqwest::Error },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Renderer error: {0}")]
    Other(String),
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Something that can answer CSS queries
pub trait Query {
    /// Returns the matching elements in document order
    fn query(&self, selector: &str) -> RenderResult<Vec<Element>>;
}

/// The capability the crawler drives
#[async_trait]
pub trait Renderer: Query + Send {
    /// Loads `url` and makes it the current document
    async fn navigate(&mut self, url: &str) -> RenderResult<()>;

    /// First `max_chars` characters of the raw current content
    fn content_preview(&self, max_chars: usize) -> String;

    /// Frees whatever the renderer holds (browser process, connections, ...)
    ///
    /// Called exactly once by `RendererSession`.
    fn release(&mut self);
}

/// Owned snapshot of a rendered element
///
/// Holds the element's visible text and attributes, plus a handle back into
/// the document it came from, so that scoped queries can run against its
/// descendants after the renderer has moved on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    text: String,
    attributes: HashMap<String, String>,
    scope: Option<Scope>,
    next_sibling: Option<Box<Element>>,
}

/// Where an element sits: the full source markup and the child-index path
/// from the document root down to the element
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Scope {
    source: Arc<str>,
    path: Vec<usize>,
}

impl Element {
    pub(crate) fn new(text: impl Into<String>, attributes: HashMap<String, String>) -> Self {
        Self {
            text: text.into(),
            attributes,
            scope: None,
            next_sibling: None,
        }
    }

    pub(crate) fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub(crate) fn with_next_sibling(mut self, sibling: Option<Element>) -> Self {
        self.next_sibling = sibling.map(Box::new);
        self
    }

    /// Visible text, one line per rendered line, blank lines removed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The element that immediately follows this one under the same parent
    ///
    /// Only captured one level deep: the returned snapshot has no sibling of its own.
    pub fn next_sibling(&self) -> Option<&Element> {
        self.next_sibling.as_deref()
    }
}

impl Query for Element {
    /// Elements built by hand carry no document and cannot be queried
    fn query(&self, selector: &str) -> RenderResult<Vec<Element>> {
        let scope = self.scope.as_ref().ok_or(RenderError::NoDocument)?;
        document::query_descendants(scope, selector)
    }
}
