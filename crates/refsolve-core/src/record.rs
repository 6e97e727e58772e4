//! The normalized reference record shared by every catalog source.

use serde::Serialize;

/// One contributor, split into family and given parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub family: String,
    pub given: String,
}

/// Catalog-independent view of one resolved reference.
///
/// Every field is always present. Absent upstream data leaves the
/// corresponding field at its default (`""`, `false`, or empty list), so
/// consumers can render without null checks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedRecord {
    /// The identifier extracted from the user's input.
    pub identifier: String,
    /// The same canonical identifier, kept as its own field for renderers.
    pub reference: String,
    /// Source discriminator: `"doi"` or `"arxiv"`.
    pub ref_type: String,
    /// Canonical landing page for the identifier.
    pub url: String,
    /// Whether this record describes a published article.
    pub has_publication: bool,
    /// Whether a print issue was found alongside the online version.
    pub has_print: bool,
    pub title: String,
    pub title_latex: String,
    pub title_html: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(rename = "author")]
    pub authors: Vec<Author>,
    pub online_year: String,
    pub online_month: String,
    pub online_day: String,
    pub print_year: String,
    pub print_month: String,
    pub print_day: String,
    /// First page, then last page when distinct.
    pub pages: Vec<String>,
    pub volume: String,
    pub issue: String,
    pub journal_full_title: String,
    pub journal_abbrev_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_fully_empty() {
        let record = NormalizedRecord::default();
        assert_eq!(record.identifier, "");
        assert!(!record.has_publication);
        assert!(!record.has_print);
        assert!(record.authors.is_empty());
        assert!(record.pages.is_empty());
    }

    #[test]
    fn serialization_renames_reserved_fields() {
        let record = NormalizedRecord {
            abstract_text: "short".into(),
            authors: vec![Author {
                family: "Imamura".into(),
                given: "Yosuke".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "short");
        assert_eq!(json["author"][0]["family"], "Imamura");
        assert!(json.get("abstract_text").is_none());
        assert!(json.get("authors").is_none());
    }
}
