//! Field extraction strategies
//!
//! Three ways of pulling a value out of a rendered document:
//! - direct text: the first non-blank match of an ordered selector chain
//! - information block: a labeled key/value box, looked up by label
//! - tag list: the pill tokens under a matching section heading
//!
//! Each strategy returns `RenderResult<Option<_>>`. `extract_field` is the one
//! place a failed query is turned into an absent value, so faults elsewhere
//! (storage, navigation) are never swallowed by extraction.

use crate::render::{Element, Query, RenderResult};

/// Containers of labeled single-value boxes
pub const INFO_BLOCK: &str = ".information-block";
/// Label inside an information block
pub const INFO_LABEL: &str = ".sub-title";
/// Value inside an information block
pub const INFO_VALUE: &str = ".text";

/// Section headings followed by their tag section
pub const SECTION_HEADING: &str = "h2.title";
/// Self-contained tag sections
pub const TAG_BLOCK: &str = ".pill-block, .information-block";
/// Headings inside a self-contained tag section
pub const TAG_BLOCK_HEADING: &str = "h3.title, h4.title, h3.sub-title";
/// Tag names, most specific first
pub const TAG_NAMES: &[&str] = &[".pill .name span", ".pill .name"];

type Step<'a, T> = Box<dyn Fn(&dyn Query) -> RenderResult<Option<T>> + 'a>;

/// Ordered list of extraction steps evaluated first-match-wins
///
/// Later steps are fallbacks only: as soon as one step yields a value the
/// rest are never run, and results are never merged.
pub struct FallbackChain<'a, T> {
    steps: Vec<(String, Step<'a, T>)>,
}

impl<'a, T> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step; `name` only shows up in trace logs
    pub fn then(
        mut self,
        name: impl Into<String>,
        step: impl Fn(&dyn Query) -> RenderResult<Option<T>> + 'a,
    ) -> Self {
        self.steps.push((name.into(), Box::new(step)));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the steps in order and returns the first value produced
    pub fn evaluate(&self, doc: &dyn Query) -> RenderResult<Option<T>> {
        for (name, step) in &self.steps {
            if let Some(value) = step(doc)? {
                tracing::trace!("Fallback step '{}' matched", name);
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Runs one field's strategy, turning any query fault into an absent value
pub fn extract_field<T>(
    field: &str,
    doc: &dyn Query,
    strategy: impl FnOnce(&dyn Query) -> RenderResult<Option<T>>,
) -> Option<T> {
    match strategy(doc) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Field '{}' unavailable: {}", field, e);
            None
        }
    }
}

/// Text of the first element matched by the first selector that yields non-blank text
pub fn direct_text(doc: &dyn Query, selectors: &[&str]) -> RenderResult<Option<String>> {
    selectors
        .iter()
        .fold(FallbackChain::new(), |chain, selector| {
            let selector = *selector;
            chain.then(selector, move |d: &dyn Query| {
                Ok(d.query(selector)?
                    .into_iter()
                    .next()
                    .and_then(|el| non_blank(el.text())))
            })
        })
        .evaluate(doc)
}

/// Value of the first information block whose label contains `label` (case-insensitive)
pub fn information_block(doc: &dyn Query, label: &str) -> RenderResult<Option<String>> {
    for block in doc.query(INFO_BLOCK)? {
        let Some(sub_title) = block.query(INFO_LABEL)?.into_iter().next() else {
            continue;
        };
        if !label_matches(sub_title.text(), label) {
            continue;
        }
        // A matching label without a value box keeps scanning.
        if let Some(value) = block.query(INFO_VALUE)?.into_iter().next() {
            return Ok(non_blank(value.text()));
        }
    }
    Ok(None)
}

/// Tag names of the first section whose heading contains `heading` (case-insensitive)
///
/// Two page layouts are probed in order: a heading immediately followed by
/// its tag container, then self-contained blocks carrying their own heading.
/// An empty list is reported as absent.
pub fn tag_list(doc: &dyn Query, heading: &str) -> RenderResult<Option<Vec<String>>> {
    let names = FallbackChain::new()
        .then("heading-sibling", |d: &dyn Query| heading_sibling_section(d, heading))
        .then("tag-block", |d: &dyn Query| tag_block_section(d, heading))
        .evaluate(doc)?;
    Ok(names.filter(|names| !names.is_empty()))
}

fn heading_sibling_section(doc: &dyn Query, heading: &str) -> RenderResult<Option<Vec<String>>> {
    for title in doc.query(SECTION_HEADING)? {
        if !label_matches(title.text(), heading) {
            continue;
        }
        let Some(section) = title.next_sibling() else {
            continue;
        };
        let tags = section.query(TAG_NAMES[0])?;
        if !tags.is_empty() {
            return Ok(Some(tag_names(&tags)));
        }
    }
    Ok(None)
}

fn tag_block_section(doc: &dyn Query, heading: &str) -> RenderResult<Option<Vec<String>>> {
    for block in doc.query(TAG_BLOCK)? {
        for title in block.query(TAG_BLOCK_HEADING)? {
            if !label_matches(title.text(), heading) {
                continue;
            }
            for selector in TAG_NAMES {
                let tags = block.query(selector)?;
                if !tags.is_empty() {
                    return Ok(Some(tag_names(&tags)));
                }
            }
        }
    }
    Ok(None)
}

fn tag_names(tags: &[Element]) -> Vec<String> {
    tags.iter().filter_map(|tag| non_blank(tag.text())).collect()
}

fn label_matches(label: &str, wanted: &str) -> bool {
    label.to_lowercase().contains(&wanted.to_lowercase())
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HtmlDocument, RenderError};

    fn doc(body: &str) -> HtmlDocument {
        HtmlDocument::new(format!("<html><body>{}</body></html>", body))
    }

    struct BrokenQuery;

    impl Query for BrokenQuery {
        fn query(&self, _selector: &str) -> RenderResult<Vec<Element>> {
            Err(RenderError::Other("renderer went away".to_string()))
        }
    }

    #[test]
    fn test_direct_text_primary_wins_over_fallback() {
        let d = doc(r#"<h1 class="title">Primary</h1><h2 class="alt">Fallback</h2>"#);
        let value = direct_text(&d, &["h1.title", "h2.alt"]).unwrap();
        assert_eq!(value, Some("Primary".to_string()));
    }

    #[test]
    fn test_direct_text_falls_back_when_primary_missing_or_blank() {
        let d = doc(r#"<h1 class="title">   </h1><h2 class="alt">Fallback</h2>"#);
        assert_eq!(
            direct_text(&d, &["h1.title", "h2.alt"]).unwrap(),
            Some("Fallback".to_string())
        );
        assert_eq!(
            direct_text(&d, &["h3.none", "h2.alt"]).unwrap(),
            Some("Fallback".to_string())
        );
        assert_eq!(direct_text(&d, &["h3.none"]).unwrap(), None);
    }

    #[test]
    fn test_direct_text_uses_first_element() {
        let d = doc(r#"<span class="date">June 1, 1950</span><span class="date">later</span>"#);
        assert_eq!(
            direct_text(&d, &[".date"]).unwrap(),
            Some("June 1, 1950".to_string())
        );
    }

    #[test]
    fn test_information_block_lookup() {
        let d = doc(
            r#"
            <div class="information-block"><div class="sub-title">Source</div><div class="text">AVPRF</div></div>
            <div class="information-block"><div class="sub-title">Rights</div><div class="text"> Public domain </div></div>
            <div class="information-block"><div class="sub-title">Record ID</div><div class="text">110001</div></div>
            "#,
        );
        assert_eq!(
            information_block(&d, "rights").unwrap(),
            Some("Public domain".to_string())
        );
        assert_eq!(
            information_block(&d, "Record ID").unwrap(),
            Some("110001".to_string())
        );
        assert_eq!(information_block(&d, "Donor").unwrap(), None);
    }

    #[test]
    fn test_information_block_first_match_wins() {
        let d = doc(
            r#"
            <div class="information-block"><div class="sub-title">Original Uploaded Date</div><div class="text">2011-11-11</div></div>
            <div class="information-block"><div class="sub-title">Uploaded Date (copy)</div><div class="text">never</div></div>
            "#,
        );
        assert_eq!(
            information_block(&d, "Uploaded Date").unwrap(),
            Some("2011-11-11".to_string())
        );
    }

    #[test]
    fn test_information_block_skips_block_without_value() {
        let d = doc(
            r#"
            <div class="information-block"><div class="sub-title">Source</div></div>
            <div class="information-block"><div class="sub-title">Source</div><div class="text">Second</div></div>
            "#,
        );
        assert_eq!(
            information_block(&d, "Source").unwrap(),
            Some("Second".to_string())
        );
    }

    #[test]
    fn test_information_block_in_table_row() {
        let d = doc(
            r#"<table><tr class="information-block"><td class="sub-title">Source</td><td class="text">AVPRF</td></tr></table>"#,
        );
        assert_eq!(
            information_block(&d, "Source").unwrap(),
            Some("AVPRF".to_string())
        );
    }

    #[test]
    fn test_tag_list_heading_sibling_layout() {
        let d = doc(
            r#"
            <h2 class="title">Authors</h2>
            <div class="pills">
                <a class="pill"><span class="name"><span>Mao Zedong</span></span></a>
                <a class="pill"><span class="name"><span>Stalin</span></span></a>
            </div>
            <h2 class="title">Subjects Discussed</h2>
            <div class="pills"><a class="pill"><span class="name"><span>Korean War</span></span></a></div>
            "#,
        );
        assert_eq!(
            tag_list(&d, "Author").unwrap(),
            Some(vec!["Mao Zedong".to_string(), "Stalin".to_string()])
        );
        assert_eq!(
            tag_list(&d, "subjects discussed").unwrap(),
            Some(vec!["Korean War".to_string()])
        );
    }

    #[test]
    fn test_tag_list_block_layout_with_name_fallback() {
        let d = doc(
            r#"
            <div class="pill-block">
                <h3 class="title">Language</h3>
                <a class="pill"><span class="name">Russian</span></a>
                <a class="pill"><span class="name">Chinese</span></a>
            </div>
            "#,
        );
        assert_eq!(
            tag_list(&d, "Language").unwrap(),
            Some(vec!["Russian".to_string(), "Chinese".to_string()])
        );
    }

    #[test]
    fn test_tag_list_prefers_heading_layout() {
        let d = doc(
            r#"
            <div class="pill-block">
                <h3 class="title">Donors</h3>
                <a class="pill"><span class="name"><span>Block Donor</span></span></a>
            </div>
            <h2 class="title">Donors</h2>
            <div><a class="pill"><span class="name"><span>Heading Donor</span></span></a></div>
            "#,
        );
        assert_eq!(
            tag_list(&d, "Donor").unwrap(),
            Some(vec!["Heading Donor".to_string()])
        );
    }

    #[test]
    fn test_tag_list_blank_names_are_absent() {
        let d = doc(
            r#"
            <h2 class="title">Associated Places</h2>
            <div><a class="pill"><span class="name"><span>  </span></span></a></div>
            "#,
        );
        assert_eq!(tag_list(&d, "Associated Places").unwrap(), None);
    }

    #[test]
    fn test_tag_list_missing_section() {
        let d = doc(r#"<h2 class="title">Authors</h2><p>no pills here</p>"#);
        assert_eq!(tag_list(&d, "Author").unwrap(), None);
        assert_eq!(tag_list(&d, "Donor").unwrap(), None);
    }

    #[test]
    fn test_extract_field_turns_faults_into_absence() {
        let value = extract_field("title", &BrokenQuery, |d| direct_text(d, &["h1.title"]));
        assert_eq!(value, None);

        let value = extract_field("authors", &BrokenQuery, |d| tag_list(d, "Author"));
        assert_eq!(value, None);
    }

    #[test]
    fn test_fallback_chain_stops_at_first_match() {
        let chain = FallbackChain::new()
            .then("none", |_: &dyn Query| Ok(None))
            .then("first", |_: &dyn Query| Ok(Some(1)))
            .then("second", |_: &dyn Query| Ok(Some(2)));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.evaluate(&BrokenQuery).unwrap(), Some(1));
        assert!(FallbackChain::<u8>::new().is_empty());
    }
}
