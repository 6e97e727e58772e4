//! Owned XML document tree with lenient, descendant-first lookups.
//!
//! Catalog responses are small (one record per document), so the whole
//! response is materialized and queried with path helpers that return
//! `Option` or empty defaults instead of failing on absent nodes.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Failure to materialize a document tree.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("XML document truncated: {open} unclosed element(s)")]
    Truncated { open: usize },
    #[error("XML document has no root element")]
    Empty,
}

/// A child of an element: nested markup or character data.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its local name, attributes, and children.
///
/// Namespace prefixes are stripped, so `<arxiv:doi>` is addressable as
/// `doi`.
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Parse a complete XML document, returning its root element.
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    // A synthetic root absorbs top-level declarations and comments; the
    // document element is unwrapped at the end.
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(element_from(&e));
            }
            Event::Empty(e) => {
                let el = element_from(&e);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Element(el));
                }
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap_or_default().into_owned();
                if !text.is_empty()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(Node::Text(text));
                }
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let text = String::from_utf8_lossy(&raw).into_owned();
                if !text.is_empty()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(Node::Text(text));
                }
            }
            Event::End(_) => {
                // The reader has already verified the end-tag name, and the
                // synthetic root never receives an End event.
                if stack.len() > 1
                    && let Some(el) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(Node::Element(el));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(XmlError::Truncated {
            open: stack.len() - 1,
        });
    }
    let root = stack.pop().unwrap_or_default();
    root.children
        .into_iter()
        .find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
        .ok_or(XmlError::Empty)
}

/// Parse markup that may have several top-level nodes (an inline HTML
/// fragment, say) by wrapping it in a synthetic container element.
pub fn parse_fragment(xml: &str) -> Result<Element, XmlError> {
    parse_document(&format!("<fragment>{xml}</fragment>"))
}

fn element_from(start: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.into_owned());
        attrs.push((key, value));
    }
    Element {
        name,
        attrs,
        children: Vec::new(),
    }
}

impl Element {
    /// Local name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of an attribute on this element.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All children, markup and character data, in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First descendant with the given local name, in document order.
    pub fn first(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first(name) {
                return Some(found);
            }
        }
        None
    }

    /// Walk a `/`-separated chain of [`Element::first`] lookups.
    pub fn path(&self, path: &str) -> Option<&Element> {
        let mut current = self;
        for segment in path.split('/') {
            current = current.first(segment)?;
        }
        Some(current)
    }

    /// Every descendant with the given local name, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// First descendant with the given name carrying `attr == value`.
    pub fn find_where(&self, name: &str, attr: &str, value: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name && child.attr(attr) == Some(value) {
                return Some(child);
            }
            if let Some(found) = child.find_where(name, attr, value) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated descendant text with whitespace runs collapsed and the
    /// ends trimmed.
    pub fn text(&self) -> String {
        collapse_whitespace(&self.raw_text()).trim().to_string()
    }

    /// Concatenated descendant text, verbatim.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.push_text(out),
            }
        }
    }

    /// `path` lookup collapsed to text; absent nodes become `""`.
    pub fn text_of(&self, path: &str) -> String {
        self.path(path).map(|el| el.text()).unwrap_or_default()
    }

    /// Reserialize this element as markup. Entity escaping and attribute
    /// quoting are normalized, and text runs collapse like
    /// [`Element::text`].
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.push_markup(&mut out);
        out
    }

    fn push_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&quick_xml::escape::escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Text(t) => {
                    let collapsed = collapse_whitespace(t);
                    out.push_str(&quick_xml::escape::escape(collapsed.as_str()));
                }
                Node::Element(el) => el.push_markup(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Collapse runs of whitespace (including newlines) to single spaces,
/// preserving a single space at either end.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog xmlns:x="http://example.org/ns">
  <journal lang="en">
    <full_title>The Journal of Results</full_title>
    <x:doi>10.1000/182</x:doi>
  </journal>
  <issue>
    <volume>12</volume>
  </issue>
  <date media="online"><year>2019</year></date>
  <date media="print"><year>2018</year></date>
</catalog>"#;

    #[test]
    fn first_finds_nested_descendants() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.name(), "catalog");
        let title = doc.first("full_title").unwrap();
        assert_eq!(title.text(), "The Journal of Results");
    }

    #[test]
    fn namespace_prefixes_are_stripped() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.text_of("doi"), "10.1000/182");
    }

    #[test]
    fn path_chains_lookups() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.text_of("issue/volume"), "12");
        assert!(doc.path("issue/nonexistent").is_none());
    }

    #[test]
    fn text_of_missing_node_is_empty() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.text_of("issue/number"), "");
    }

    #[test]
    fn find_where_selects_by_attribute() {
        let doc = parse_document(DOC).unwrap();
        let print = doc.find_where("date", "media", "print").unwrap();
        assert_eq!(print.text_of("year"), "2018");
        assert!(doc.find_where("date", "media", "preprint").is_none());
    }

    #[test]
    fn find_all_returns_document_order() {
        let doc = parse_document(DOC).unwrap();
        let dates = doc.find_all("date");
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].attr("media"), Some("online"));
        assert_eq!(dates[1].attr("media"), Some("print"));
    }

    #[test]
    fn text_collapses_whitespace_across_children() {
        let doc = parse_document("<p>one\n   two <b>three</b>\n</p>").unwrap();
        assert_eq!(doc.text(), "one two three");
    }

    #[test]
    fn entities_unescape_in_text_and_reescape_in_markup() {
        let doc = parse_document("<t>salt &amp; pepper</t>").unwrap();
        assert_eq!(doc.text(), "salt & pepper");
        assert_eq!(doc.to_markup(), "<t>salt &amp; pepper</t>");
    }

    #[test]
    fn entities_unescape_in_attribute_values() {
        let doc = parse_document(r#"<link href="?id=1&amp;fmt=atom"/>"#).unwrap();
        assert_eq!(doc.attr("href"), Some("?id=1&fmt=atom"));
        assert_eq!(doc.to_markup(), r#"<link href="?id=1&amp;fmt=atom"/>"#);
    }

    #[test]
    fn markup_round_trips_tags_and_attributes() {
        let doc = parse_fragment(r#"<b>hello</b> <a href="x">y</a><hr/>"#).unwrap();
        assert_eq!(
            doc.to_markup(),
            r#"<fragment><b>hello</b> <a href="x">y</a><hr/></fragment>"#
        );
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        assert!(parse_document("<a><b></a>").is_err());
    }

    #[test]
    fn truncated_document_is_an_error() {
        assert!(matches!(
            parse_document("<a><b>text"),
            Err(XmlError::Truncated { open: 2 })
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_document("  "), Err(XmlError::Empty)));
    }
}
