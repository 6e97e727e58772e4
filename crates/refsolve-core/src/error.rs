use thiserror::Error;

/// Errors produced while resolving a reference.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input matched neither a DOI nor an arXiv identifier pattern.
    #[error("{input} is not a valid DOI or arXiv ID")]
    UnrecognizedIdentifier { input: String },

    /// The catalog rejected the identifier (HTTP 400 or 404).
    #[error("incorrect {catalog}: {id}")]
    IncorrectIdentifier {
        catalog: &'static str,
        id: String,
        status: u16,
    },

    /// The catalog gateway timed out (HTTP 504), or the request deadline
    /// expired before a response arrived.
    #[error("gateway timeout while looking up {id}, please try again")]
    GatewayTimeout { id: String },

    /// Any other non-success HTTP status.
    #[error("lookup for {id} failed with HTTP {status}")]
    FetchFailed { id: String, status: u16 },

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The response decoded, but a mandatory field was absent or unparseable.
    #[error("malformed upstream data: {0}")]
    MalformedUpstreamData(String),
}

impl ResolveError {
    /// Classify a transport error, folding client-side deadline expiry into
    /// the same class as an upstream 504.
    pub(crate) fn from_transport(id: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResolveError::GatewayTimeout { id: id.to_string() }
        } else {
            ResolveError::Network(err)
        }
    }

    /// Whether retrying the same lookup could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::GatewayTimeout { .. })
    }
}
