use forgemail_gateway::FetchError;
use thiserror::Error;

/// Errors produced while running extraction strategies.
///
/// Every variant is a degraded outcome, never a reason to stop the run:
/// the strategy that hit it reports not-found and the chain moves on.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The underlying fetch failed (transport, status, or rate limit)
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Malformed obfuscated content (e.g. a bad percent-encoding)
    #[error("decode error: {0}")]
    Decode(String),

    /// A response body that should be JSON wasn't
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether the failure was a rate-limit rejection.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Fetch(err) if err.is_rate_limited())
    }
}

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;
