//! Conversion of inline-markup fragments into parallel renderings.
//!
//! Catalog titles and abstracts arrive with embedded presentation tags
//! (`<i>`, `<sub>`, ...). Downstream consumers need the same content as
//! plain text, as LaTeX, and as HTML, so a single walk over the fragment
//! produces all three.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::xml::{Element, Node, collapse_whitespace};

/// One fragment rendered three ways. All fields hold `""` when the source
/// node is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRendering {
    pub plain: String,
    pub latex: String,
    pub html: String,
}

static LATEX_WRAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("i", "\\textit"),
        ("em", "\\emph"),
        ("b", "\\textbf"),
        ("strong", "\\textbf"),
        ("u", "\\underline"),
        ("sub", "\\textsubscript"),
        ("sup", "\\textsuperscript"),
    ])
});

/// Flatten a markup fragment into plain, LaTeX, and HTML renderings.
///
/// Only the direct children of `fragment` are dispatched on: known
/// presentation tags map to LaTeX commands, unknown tags contribute their
/// flattened text to the plain and LaTeX forms, and the HTML form keeps
/// every tag as-is. Whitespace runs collapse to single spaces.
pub fn convert(fragment: Option<&Element>) -> FragmentRendering {
    let Some(fragment) = fragment else {
        return FragmentRendering::default();
    };

    let mut plain = String::new();
    let mut latex = String::new();
    let mut html = String::new();

    for node in fragment.children() {
        match node {
            Node::Text(t) => {
                let collapsed = collapse_whitespace(t);
                plain.push_str(&collapsed);
                latex.push_str(&collapsed);
                html.push_str(&collapsed);
            }
            Node::Element(el) => {
                let inner = el.text();
                plain.push_str(&inner);
                match LATEX_WRAP.get(el.name()) {
                    Some(cmd) => {
                        latex.push_str(cmd);
                        latex.push('{');
                        latex.push_str(&inner);
                        latex.push('}');
                    }
                    None => latex.push_str(&inner),
                }
                html.push_str(&el.to_markup());
            }
        }
    }

    FragmentRendering {
        plain: plain.trim().to_string(),
        latex: latex.trim().to_string(),
        html: html.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_fragment;

    #[test]
    fn known_tags_map_to_latex_commands() {
        let frag =
            parse_fragment("<b>hello</b> world<sub>2</sub>\n   <random>!</random>").unwrap();
        let r = convert(Some(&frag));
        assert_eq!(r.plain, "hello world2 !");
        assert_eq!(r.latex, "\\textbf{hello} world\\textsubscript{2} !");
        assert_eq!(r.html, "<b>hello</b> world<sub>2</sub> <random>!</random>");
        // Pure function of the fragment.
        assert_eq!(convert(Some(&frag)), r);
    }

    #[test]
    fn absent_fragment_renders_empty() {
        assert_eq!(convert(None), FragmentRendering::default());
    }

    #[test]
    fn bare_text_renders_identically() {
        let frag = parse_fragment("A   plain\ntitle").unwrap();
        let r = convert(Some(&frag));
        assert_eq!(r.plain, "A plain title");
        assert_eq!(r.latex, "A plain title");
        assert_eq!(r.html, "A plain title");
    }

    #[test]
    fn nested_markup_keeps_only_outer_latex_wrap() {
        let frag = parse_fragment("<b><i>x</i></b>").unwrap();
        let r = convert(Some(&frag));
        assert_eq!(r.plain, "x");
        assert_eq!(r.latex, "\\textbf{x}");
        assert_eq!(r.html, "<b><i>x</i></b>");
    }

    #[test]
    fn entities_unescape_in_all_forms() {
        let frag = parse_fragment("salt &amp; pepper").unwrap();
        let r = convert(Some(&frag));
        assert_eq!(r.plain, "salt & pepper");
        assert_eq!(r.latex, "salt & pepper");
        assert_eq!(r.html, "salt & pepper");
    }

    #[test]
    fn emphasis_variants_pick_distinct_commands() {
        let frag = parse_fragment("<em>a</em><strong>b</strong><sup>2</sup>").unwrap();
        let r = convert(Some(&frag));
        assert_eq!(r.latex, "\\emph{a}\\textbf{b}\\textsuperscript{2}");
    }
}
