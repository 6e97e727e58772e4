use refsolve_core::NormalizedRecord;
use thiserror::Error;

use crate::filters::{month_abbr, unicode_to_latex};

/// Output formats a record can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bibtex,
    Md,
    Rst,
    Text,
    Json,
}

impl OutputFormat {
    /// Every format, in presentation order.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Bibtex,
            OutputFormat::Md,
            OutputFormat::Rst,
            OutputFormat::Text,
            OutputFormat::Json,
        ]
    }

    /// Look a format up by its CLI name.
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name {
            "bibtex" => Some(OutputFormat::Bibtex),
            "md" => Some(OutputFormat::Md),
            "rst" => Some(OutputFormat::Rst),
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Bibtex => "bibtex",
            OutputFormat::Md => "md",
            OutputFormat::Rst => "rst",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render a record in the given format. Every rendering ends with a
/// newline.
pub fn render(record: &NormalizedRecord, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Bibtex => Ok(render_bibtex(record)),
        OutputFormat::Md => Ok(render_md(record)),
        OutputFormat::Rst => Ok(render_rst(record)),
        OutputFormat::Text => Ok(render_text(record)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)? + "\n"),
    }
}

/// Citation key: first author's family name (ASCII-filtered), the
/// identifier when there are no authors, then year and lowercase month
/// abbreviation, e.g. `Shi2010jul`.
pub fn citation_key(record: &NormalizedRecord) -> String {
    let base: String = match record.authors.first() {
        Some(author) => author
            .family
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect(),
        None => String::new(),
    };
    let base = if base.is_empty() {
        record
            .identifier
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect()
    } else {
        base
    };
    let (year, month) = citation_date(record);
    format!("{base}{year}{}", month_abbr(month).to_lowercase())
}

/// Year and month used for citation purposes: the print date when one
/// exists, the online date otherwise.
fn citation_date(record: &NormalizedRecord) -> (&str, &str) {
    if record.has_print && !record.print_year.is_empty() {
        (&record.print_year, &record.print_month)
    } else {
        (&record.online_year, &record.online_month)
    }
}

/// `Family, Given., Family, Given` listing shared by the prose formats.
fn author_listing(record: &NormalizedRecord) -> String {
    record
        .authors
        .iter()
        .map(|a| format!("{}, {}", a.family, a.given))
        .collect::<Vec<_>>()
        .join("., ")
}

fn render_bibtex(record: &NormalizedRecord) -> String {
    let (year, month) = citation_date(record);
    let mut fields: Vec<(&str, String)> = Vec::new();

    if !record.authors.is_empty() {
        let authors = record
            .authors
            .iter()
            .map(|a| unicode_to_latex(&format!("{}, {}", a.family, a.given)))
            .collect::<Vec<_>>()
            .join(" and ");
        fields.push(("author", authors));
    }
    if !record.title_latex.is_empty() {
        fields.push(("title", record.title_latex.clone()));
    }
    if record.has_publication && !record.journal_full_title.is_empty() {
        fields.push(("journal", unicode_to_latex(&record.journal_full_title)));
    }
    if !year.is_empty() {
        fields.push(("year", year.to_string()));
    }
    let month = month_abbr(month).to_lowercase();
    if !month.is_empty() {
        fields.push(("month", month));
    }
    if record.has_print {
        if !record.volume.is_empty() {
            fields.push(("volume", record.volume.clone()));
        }
        if !record.issue.is_empty() {
            fields.push(("number", record.issue.clone()));
        }
        if !record.pages.is_empty() {
            fields.push(("pages", record.pages.join("--")));
        }
    }
    match record.ref_type.as_str() {
        "arxiv" => {
            fields.push(("eprint", record.identifier.clone()));
            fields.push(("archiveprefix", "arXiv".to_string()));
        }
        _ => fields.push(("doi", record.identifier.clone())),
    }
    fields.push(("url", record.url.clone()));
    if !record.abstract_text.is_empty() {
        fields.push(("abstract", record.abstract_text.clone()));
    }

    let entry_type = if record.has_publication {
        "article"
    } else {
        "misc"
    };
    let mut out = format!("@{entry_type}{{{},\n", citation_key(record));
    for (name, value) in fields {
        out.push_str(&format!("  {name} = {{{value}}},\n"));
    }
    out.push_str("}\n");
    out
}

fn render_md(record: &NormalizedRecord) -> String {
    let key = citation_key(record);
    let (year, _) = citation_date(record);
    let mut out = format!("[^{key}]: **{key}**");
    push_prose_body(
        &mut out,
        record,
        year,
        |journal| format!(" *{journal}*,"),
        |year| format!(" **{year}**,"),
        |volume| format!(" *{volume}*,"),
    );
    out.push_str(&format!(
        " [{}]({}).\n",
        record.identifier, record.url
    ));
    out
}

fn render_rst(record: &NormalizedRecord) -> String {
    let key = citation_key(record);
    let (year, _) = citation_date(record);
    let mut out = format!(".. [#{key}] **{key}**");
    push_prose_body(
        &mut out,
        record,
        year,
        |journal| format!(" *{journal}*,"),
        |year| format!(" **{year}**,"),
        |volume| format!(" *{volume}*,"),
    );
    out.push_str(&format!(" `{} <{}>`__.\n", record.identifier, record.url));
    out
}

fn render_text(record: &NormalizedRecord) -> String {
    let key = citation_key(record);
    let (year, _) = citation_date(record);
    let mut out = key;
    push_prose_body(
        &mut out,
        record,
        year,
        |journal| format!(" {journal},"),
        |year| format!(" {year},"),
        |volume| format!(" {volume},"),
    );
    let label = if record.ref_type == "arxiv" {
        "arXiv"
    } else {
        "doi"
    };
    out.push_str(&format!(" {label}:{}\n", record.identifier));
    out
}

/// Shared middle section of the prose formats: authors, quoted title,
/// journal, year, volume, and pages, each emitted only when present.
fn push_prose_body(
    out: &mut String,
    record: &NormalizedRecord,
    year: &str,
    journal_style: impl Fn(&str) -> String,
    year_style: impl Fn(&str) -> String,
    volume_style: impl Fn(&str) -> String,
) {
    let authors = author_listing(record);
    if !authors.is_empty() {
        out.push_str(&format!(" {authors}."));
    }
    if !record.title.is_empty() {
        out.push_str(&format!(" \"{}\".", record.title));
    }
    if record.has_publication && !record.journal_full_title.is_empty() {
        out.push_str(&journal_style(&record.journal_full_title));
    }
    if !year.is_empty() {
        out.push_str(&year_style(year));
    }
    if record.has_print {
        if !record.volume.is_empty() {
            out.push_str(&volume_style(&record.volume));
        }
        if !record.pages.is_empty() {
            out.push_str(&format!(" {}", record.pages.join("--")));
        }
    }
}
