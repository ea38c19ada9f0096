//! Static HTML documents queried with `scraper`

use crate::render::{Element, Query, RenderError, RenderResult, Scope};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::Arc;

/// Subtrees that never contribute to visible text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "tfoot", "thead", "tr", "ul",
];

/// A fetched page's raw markup
///
/// The markup is re-parsed for every query, which keeps the document `Send`
/// so it can live inside an async renderer. Parsing is deterministic, so
/// element snapshots can find their way back into the same tree later.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Arc<str>,
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Arc::from(html.into()),
        }
    }

    /// First `max_chars` characters of the markup
    pub fn preview(&self, max_chars: usize) -> String {
        self.html.chars().take(max_chars).collect()
    }
}

impl Query for HtmlDocument {
    fn query(&self, selector: &str) -> RenderResult<Vec<Element>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document
            .select(&selector)
            .map(|el| snapshot(el, &self.html))
            .collect())
    }
}

/// Runs `selector` against the descendants of the element `scope` points at
///
/// The query runs in the element's original tree, so table rows and cells
/// keep their context and the element itself is never part of the result.
pub(crate) fn query_descendants(scope: &Scope, selector: &str) -> RenderResult<Vec<Element>> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(&scope.source);
    let root = resolve_path(&document, &scope.path).ok_or_else(|| {
        RenderError::Other("element snapshot no longer matches its document".to_string())
    })?;

    Ok(root
        .select(&selector)
        .filter(|el| el.id() != root.id())
        .map(|el| snapshot(el, &scope.source))
        .collect())
}

fn parse_selector(selector: &str) -> RenderResult<Selector> {
    Selector::parse(selector).map_err(|_| RenderError::InvalidSelector(selector.to_string()))
}

fn snapshot(element: ElementRef<'_>, source: &Arc<str>) -> Element {
    let sibling = element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(|sibling| snapshot_flat(sibling, source));
    snapshot_flat(element, source).with_next_sibling(sibling)
}

fn snapshot_flat(element: ElementRef<'_>, source: &Arc<str>) -> Element {
    let attributes = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    let scope = Scope {
        source: Arc::clone(source),
        path: node_path(element),
    };
    Element::new(rendered_text(element), attributes).with_scope(scope)
}

/// Child indices leading from the document root down to `element`
fn node_path(element: ElementRef<'_>) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = *element;
    while let Some(parent) = node.parent() {
        path.push(node.prev_siblings().count());
        node = parent;
    }
    path.reverse();
    path
}

fn resolve_path<'a>(document: &'a Html, path: &[usize]) -> Option<ElementRef<'a>> {
    let mut node = document.tree.root();
    for &index in path {
        node = node.children().nth(index)?;
    }
    ElementRef::wrap(node)
}

/// Text as a browser would lay it out: block elements and `<br>` start new
/// lines, hidden subtrees are left out, whitespace is normalized
fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);
    normalize_text(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        out.push('\n');
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_visible_text(child, out);
                }
            }
            _ => {}
        }
    }
    if block {
        out.push('\n');
    } else if matches!(name, "td" | "th") {
        out.push(' ');
    }
}

/// Collapses whitespace runs inside each line and drops blank lines
fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
