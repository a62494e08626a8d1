//! HTTP fetch layer with bounded concurrency and rate-limit detection.

use crate::budget::ConcurrencyBudget;
use crate::error::{FetchError, Result};
use crate::rate_limit::RateLimitState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Phrase the platform embeds in otherwise-200 JSON bodies when the
/// request quota is exhausted.
const RATE_LIMIT_PHRASE: &str = "rate limit exceeded";

/// Performs a single bounded HTTP GET.
///
/// Implementations must be thread-safe (Send + Sync): one fetcher is
/// shared by every retrieval task in a run. Tests substitute stub
/// implementations for the real gateway.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the body at `url`.
    ///
    /// # Errors
    /// Returns `RateLimited` when the service signals quota rejection,
    /// `Status` for any other non-2xx response, and `Transport` for
    /// timeouts and connection failures.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Gateway issuing real HTTPS GET requests through a shared client.
///
/// Every fetch acquires one token from the concurrency budget before
/// the request goes out; the token is released on every exit path.
/// Rate-limit signals trip the shared [`RateLimitState`] and surface as
/// [`FetchError::RateLimited`] without aborting anything.
pub struct HttpGateway {
    client: Client,
    budget: ConcurrencyBudget,
    rate_limit: Arc<RateLimitState>,
    max_body_bytes: usize,
}

impl HttpGateway {
    /// Build a gateway from the network configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        network: &forgemail_core::NetworkConfig,
        rate_limit: Arc<RateLimitState>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .user_agent(network.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            budget: ConcurrencyBudget::new(network.max_concurrent),
            rate_limit,
            max_body_bytes: network.max_body_bytes,
        })
    }

    fn trip_rate_limit(&self, reset: Option<DateTime<Utc>>) {
        if self.rate_limit.trip() {
            warn!(
                ?reset,
                "rate limit exceeded; API-backed strategies disabled for the rest of the run"
            );
        }
    }
}

#[async_trait]
impl Fetch for HttpGateway {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let _permit = self.budget.acquire().await;

        debug!(%url, "requesting");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            let reset = reset_timestamp(response.headers());
            self.trip_rate_limit(reset);
            return Err(FetchError::RateLimited { reset });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = read_capped(response, self.max_body_bytes).await?;

        if contains_rate_limit_phrase(&body) {
            self.trip_rate_limit(None);
            return Err(FetchError::RateLimited { reset: None });
        }

        Ok(body)
    }
}

/// Parse the quota reset time advertised in the response headers.
fn reset_timestamp(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get("x-ratelimit-reset")?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()
        .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
}

/// Whether a 2xx body carries the embedded quota-rejection phrase.
fn contains_rate_limit_phrase(body: &[u8]) -> bool {
    String::from_utf8_lossy(body).contains(RATE_LIMIT_PHRASE)
}

/// Append `chunk` to `buf`, truncating at `cap`. Returns `true` once the
/// cap has been reached.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    let remaining = cap.saturating_sub(buf.len());
    if chunk.len() >= remaining {
        buf.extend_from_slice(&chunk[..remaining]);
        return true;
    }
    buf.extend_from_slice(chunk);
    false
}

/// Stream the response body into memory, truncated at `cap` bytes.
/// Oversized bodies are truncated, not rejected.
async fn read_capped(response: Response, cap: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if append_capped(&mut body, &chunk, cap) {
            debug!(cap, "response body truncated at size cap");
            break;
        }
    }

    Ok(body)
}
