//! Catalog sources and the shared fetch-and-extract pipeline.
//!
//! Each source contributes its endpoint URLs and an extraction pass over
//! the decoded response; request dispatch, status handling, and XML
//! decoding are shared.

pub mod arxiv;
pub mod crossref;

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;

use crate::error::ResolveError;
use crate::record::NormalizedRecord;
use crate::xml;

pub use arxiv::Arxiv;
pub use crossref::CrossRef;

/// One queryable metadata catalog.
pub trait CatalogSource: Send + Sync {
    /// Human-readable source name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Value stored in [`NormalizedRecord::ref_type`].
    fn ref_type(&self) -> &'static str;

    /// Endpoint queried for the identifier's metadata.
    fn query_url(&self, id: &str) -> String;

    /// Canonical landing page stored in [`NormalizedRecord::url`].
    fn display_url(&self, id: &str) -> String;

    /// Accept header for content negotiation, when the source needs one.
    fn accept(&self) -> Option<&'static str> {
        None
    }

    /// Populate `record` from the decoded response document.
    fn extract(&self, doc: &xml::Element, record: &mut NormalizedRecord)
    -> Result<(), ResolveError>;
}

/// Fetch an identifier's metadata from `source` and normalize it.
pub async fn fetch_record(
    source: &dyn CatalogSource,
    id: &str,
    client: &reqwest::Client,
    timeout: Duration,
) -> Result<NormalizedRecord, ResolveError> {
    let url = source.query_url(id);
    tracing::debug!(id = id, url = %url, "querying {}", source.name());

    let mut request = client.get(&url).timeout(timeout);
    if let Some(accept) = source.accept() {
        request = request.header(ACCEPT, accept);
    }
    let response = request
        .send()
        .await
        .map_err(|e| ResolveError::from_transport(id, e))?;

    classify_status(source.name(), id, response.status())?;

    let body = response
        .text()
        .await
        .map_err(|e| ResolveError::from_transport(id, e))?;
    parse_record(source, id, &body)
}

/// Decode a response body and run the source's extraction pass.
///
/// Split from [`fetch_record`] so extraction is testable against canned
/// responses.
pub fn parse_record(
    source: &dyn CatalogSource,
    id: &str,
    body: &str,
) -> Result<NormalizedRecord, ResolveError> {
    let doc = xml::parse_document(body)
        .map_err(|e| ResolveError::MalformedUpstreamData(format!("undecodable XML: {e}")))?;

    let mut record = NormalizedRecord {
        identifier: id.to_string(),
        reference: id.to_string(),
        ref_type: source.ref_type().to_string(),
        url: source.display_url(id),
        ..Default::default()
    };
    source.extract(&doc, &mut record)?;
    Ok(record)
}

/// Map a response status onto the error taxonomy, logging the outcome.
pub fn classify_status(
    source_name: &'static str,
    id: &str,
    status: StatusCode,
) -> Result<(), ResolveError> {
    match status.as_u16() {
        200..=299 => {
            tracing::info!(id = id, "{} found", source_name);
            Ok(())
        }
        400 | 404 => {
            tracing::error!(id = id, "incorrect {}", source_name);
            Err(ResolveError::IncorrectIdentifier {
                catalog: source_name,
                id: id.to_string(),
                status: status.as_u16(),
            })
        }
        504 => {
            tracing::error!(id = id, "gateway timeout, please try again");
            Err(ResolveError::GatewayTimeout { id: id.to_string() })
        }
        code => {
            tracing::error!(id = id, status = code, "{} lookup failed", source_name);
            Err(ResolveError::FetchFailed {
                id: id.to_string(),
                status: code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn success_statuses_pass() {
        assert!(classify_status("DOI", "10.1000/182", status(200)).is_ok());
        assert!(classify_status("DOI", "10.1000/182", status(204)).is_ok());
    }

    #[test]
    fn not_found_is_an_incorrect_identifier() {
        for code in [400, 404] {
            let err = classify_status("DOI", "10.1000/nope", status(code)).unwrap_err();
            assert!(matches!(
                err,
                ResolveError::IncorrectIdentifier { catalog: "DOI", .. }
            ));
        }
    }

    #[test]
    fn gateway_timeout_is_retryable() {
        let err = classify_status("arXiv ID", "1807.01219", status(504)).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn other_statuses_fail_with_code() {
        let err = classify_status("DOI", "10.1000/182", status(500)).unwrap_err();
        assert!(matches!(err, ResolveError::FetchFailed { status: 500, .. }));
        assert!(!err.is_retryable());
    }
}
