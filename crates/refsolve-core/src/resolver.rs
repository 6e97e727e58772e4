//! Classification and dispatch of raw references to catalog sources.

use std::time::Duration;

use crate::catalog::{self, Arxiv, CatalogSource, CrossRef};
use crate::error::ResolveError;
use crate::ident::{self, ReferenceKind};
use crate::record::NormalizedRecord;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

static APP_USER_AGENT: &str = concat!("refsolve/", env!("CARGO_PKG_VERSION"));

/// Knobs for building a [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Contact address appended to the User-Agent. Polite-pool etiquette
    /// for the CrossRef resolver; optional everywhere.
    pub mailto: Option<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mailto: None,
        }
    }
}

/// Resolves raw reference strings into normalized records.
pub struct Resolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Result<Self, ResolveError> {
        let user_agent = match &options.mailto {
            Some(mailto) => format!("{APP_USER_AGENT} (mailto:{mailto})"),
            None => APP_USER_AGENT.to_string(),
        };
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(ResolveError::Network)?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(options.timeout_secs),
        })
    }

    /// Extract an identifier from `input`, query the matching catalog, and
    /// normalize the result.
    pub async fn resolve(&self, input: &str) -> Result<NormalizedRecord, ResolveError> {
        let (id, kind) = ident::classify(input);
        let source: &dyn CatalogSource = match kind {
            ReferenceKind::Publication => &CrossRef,
            ReferenceKind::Preprint => &Arxiv,
            ReferenceKind::Unrecognized => {
                return Err(ResolveError::UnrecognizedIdentifier { input: id });
            }
        };
        catalog::fetch_record(source, &id, &self.client, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unrecognized_input_fails_without_a_request() {
        let resolver = Resolver::new(ResolverOptions::default()).unwrap();
        let err = resolver.resolve("not an identifier").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnrecognizedIdentifier { ref input } if input == "not an identifier"
        ));
    }

    #[test]
    fn resolver_builds_with_mailto() {
        assert!(
            Resolver::new(ResolverOptions {
                timeout_secs: 1,
                mailto: Some("mail@example.org".to_string()),
            })
            .is_ok()
        );
    }
}
