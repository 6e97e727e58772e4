//! arXiv catalog source, queried through the export API's Atom feed.

use chrono::{Datelike, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::CatalogSource;
use crate::error::ResolveError;
use crate::record::{Author, NormalizedRecord};
use crate::xml::Element;

const UPDATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Splits a display name at the last interior space: everything before it
/// is the given name, the final word the family name.
static NAME_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^(.+) (\w+)").unwrap());

pub struct Arxiv;

impl CatalogSource for Arxiv {
    fn name(&self) -> &'static str {
        "arXiv ID"
    }

    fn ref_type(&self) -> &'static str {
        "arxiv"
    }

    fn query_url(&self, id: &str) -> String {
        format!(
            "https://export.arxiv.org/api/query?id_list={}",
            urlencoding::encode(id)
        )
    }

    fn display_url(&self, id: &str) -> String {
        format!("https://arxiv.org/abs/{id}")
    }

    fn extract(&self, doc: &Element, record: &mut NormalizedRecord) -> Result<(), ResolveError> {
        record.has_publication = false;
        record.has_print = false;

        let entry = doc.first("entry").ok_or_else(|| {
            ResolveError::MalformedUpstreamData("arXiv feed contains no entry".to_string())
        })?;

        // Cross-listed published versions carry a DOI link. Surface it so
        // the user can re-resolve; the record itself stays a preprint.
        if let Some(href) = entry
            .find_where("link", "title", "doi")
            .and_then(|link| link.attr("href"))
        {
            tracing::warn!(id = %record.identifier, "article has doi: {href}");
        }

        if let Some(summary) = entry.first("summary") {
            record.abstract_text = summary.text();
        }

        if let Some(title) = entry.first("title") {
            let joined = title.raw_text().trim().replace("\n ", "");
            record.title = joined.clone();
            record.title_latex = joined;
        }

        let updated = entry.first("updated").ok_or_else(|| {
            ResolveError::MalformedUpstreamData("arXiv entry has no updated timestamp".to_string())
        })?;
        let stamp = updated.text();
        let parsed = NaiveDateTime::parse_from_str(&stamp, UPDATED_FORMAT).map_err(|e| {
            ResolveError::MalformedUpstreamData(format!("bad updated timestamp {stamp:?}: {e}"))
        })?;
        record.online_year = parsed.year().to_string();
        record.online_month = parsed.month().to_string();
        record.online_day = parsed.day().to_string();

        for name in entry.find_all("name") {
            record.authors.push(split_author(&name.text())?);
        }

        Ok(())
    }
}

/// Split `"Given [Middle ...] Family"` into its parts.
///
/// Generational suffixes ("John Smith Jr.") land in the family slot; the
/// feed gives no structured split to recover them from.
fn split_author(name: &str) -> Result<Author, ResolveError> {
    let caps = NAME_SPLIT.captures(name.trim()).ok_or_else(|| {
        ResolveError::MalformedUpstreamData(format!("cannot split author name {name:?}"))
    })?;
    Ok(Author {
        family: caps[2].to_string(),
        given: caps[1].to_string(),
    })
}
