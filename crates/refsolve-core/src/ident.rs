//! Identifier extraction from free-form reference strings.

use once_cell::sync::Lazy;
use regex::Regex;

/// What kind of record an identifier denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A DOI pointing at a published article.
    Publication,
    /// An arXiv identifier, either numbering scheme.
    Preprint,
    /// Neither pattern matched.
    Unrecognized,
}

static DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"10\.\d{4,9}/[-._;()/:a-zA-Z0-9]+").unwrap());

/// Post-2007 arXiv numbering: YYMM.NNNNN with an optional version suffix.
static ARXIV_NEW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\.\d{4,5}(v\d+)?").unwrap());

/// Pre-2007 arXiv numbering: archive[.SC]/YYMMNNN with an optional version
/// suffix.
static ARXIV_OLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-a-z]+(\.[A-Z]{2})?/\d{7}(v\d+)?").unwrap());

/// Extract a canonical identifier from free-form input.
///
/// Patterns are searched anywhere in the string, so resolver URLs and
/// `arXiv:` prefixes work; the first matching pattern wins, DOIs checked
/// first. Unrecognized input is returned unchanged so callers can echo it
/// back to the user.
pub fn classify(input: &str) -> (String, ReferenceKind) {
    if let Some(m) = DOI.find(input) {
        return (m.as_str().to_string(), ReferenceKind::Publication);
    }
    if let Some(m) = ARXIV_NEW.find(input) {
        return (m.as_str().to_string(), ReferenceKind::Preprint);
    }
    if let Some(m) = ARXIV_OLD.find(input) {
        return (m.as_str().to_string(), ReferenceKind::Preprint);
    }
    tracing::error!("{input} is not a valid DOI or arXiv ID");
    (input.to_string(), ReferenceKind::Unrecognized)
}
