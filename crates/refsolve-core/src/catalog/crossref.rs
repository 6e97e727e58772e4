//! CrossRef catalog source, queried through the DOI resolver.
//!
//! Content negotiation requests the CrossRef unixsd deposit format, which
//! carries full journal, contributor, and print-issue metadata.

use crate::catalog::CatalogSource;
use crate::error::ResolveError;
use crate::fragment;
use crate::record::{Author, NormalizedRecord};
use crate::xml::Element;

const UNIXSD: &str = "application/vnd.crossref.unixsd+xml";

pub struct CrossRef;

impl CatalogSource for CrossRef {
    fn name(&self) -> &'static str {
        "DOI"
    }

    fn ref_type(&self) -> &'static str {
        "doi"
    }

    fn query_url(&self, id: &str) -> String {
        format!("https://dx.doi.org/{id}")
    }

    fn display_url(&self, id: &str) -> String {
        format!("https://doi.org/{id}")
    }

    fn accept(&self) -> Option<&'static str> {
        Some(UNIXSD)
    }

    fn extract(&self, doc: &Element, record: &mut NormalizedRecord) -> Result<(), ResolveError> {
        record.has_publication = true;

        if let Some(journal) = doc.first("journal_metadata") {
            record.journal_full_title = journal.text_of("full_title");
            record.journal_abbrev_title = journal.text_of("abbrev_title");
        }

        // A resolvable DOI is not necessarily a journal article (books,
        // datasets, posted content). Those records keep empty fields.
        let Some(article) = doc.first("journal_article") else {
            return Ok(());
        };

        if let Some(contributors) = article.first("contributors") {
            for person in contributors.find_all("person_name") {
                record.authors.push(Author {
                    family: person.text_of("surname"),
                    given: person.text_of("given_name"),
                });
            }
        }

        let title = fragment::convert(article.path("titles/title"));
        record.title = title.plain;
        record.title_latex = title.latex;
        record.title_html = title.html;

        if let Some(abstract_node) = article.first("abstract") {
            record.abstract_text = abstract_node.text();
        }

        if let Some(online) = article.find_where("publication_date", "media_type", "online") {
            record.online_year = online.text_of("year");
            record.online_month = online.text_of("month");
            record.online_day = online.text_of("day");
        }

        if let Some(print) = article.find_where("publication_date", "media_type", "print") {
            tracing::info!(id = %record.identifier, "print version found");
            record.has_print = true;
            record.print_year = print.text_of("year");
            record.print_month = print.text_of("month");
            record.print_day = print.text_of("day");

            if let Some(pages) = article.first("pages") {
                let first = pages.text_of("first_page");
                let last = pages.text_of("last_page");
                if !first.is_empty() {
                    record.pages.push(first.clone());
                }
                if !last.is_empty() && last != first {
                    record.pages.push(last);
                }
            }

            if let Some(issue) = doc.first("journal_issue") {
                record.volume = issue.text_of("journal_volume/volume");
                record.issue = issue.text_of("issue");
            }
        }

        Ok(())
    }
}
