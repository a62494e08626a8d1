use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by a fetch through the request gateway.
///
/// None of these are fatal to a run: callers treat every variant as a
/// not-found outcome for the strategy that triggered the fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The rate-limited service rejected the request for quota reasons.
    /// Carries the advertised reset time when the response included one.
    #[error("rate limited, resets at {reset:?}")]
    RateLimited {
        /// Quota reset time, if the response advertised one
        reset: Option<DateTime<Utc>>,
    },

    /// A non-2xx status unrelated to quota
    #[error("unexpected status {status}")]
    Status {
        /// The HTTP status code
        status: u16,
    },

    /// Timeout, connection failure, or any other transport-level error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether this fetch failed because the service is rate limiting us.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Result type alias using `FetchError`.
pub type Result<T> = std::result::Result<T, FetchError>;
