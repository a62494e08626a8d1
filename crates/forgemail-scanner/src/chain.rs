//! Ordered fallback chain of email-extraction strategies.
//!
//! For each account, three strategies are tried in order, each only when
//! the previous one produced nothing:
//!
//! 1. structured profile metadata from the rate-limited API service,
//! 2. the human-facing profile page, which sometimes exposes a contact
//!    link obfuscated with hexadecimal character escapes,
//! 3. the account's most recently updated owned repositories, reading
//!    every author address out of their commit histories.
//!
//! Strategies 1 and 3 depend on the rate-limited service and are skipped
//! once the shared rate-limit flag trips. Strategy 3 accumulates every
//! address it finds: the commit metadata can expose several distinct
//! author addresses with no way to tell which is authoritative.

use crate::error::{Result, ScanError};
use crate::urls::Endpoints;
use forgemail_core::{Email, Handle};
use forgemail_gateway::{Fetch, RateLimitState};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Obfuscated contact link inside the profile page markup.
static MAILTO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""mailto:([^"]+)""#).expect("mailto regex is hardcoded and valid")
});

#[derive(Debug, Deserialize)]
struct ProfileMetadata {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    full_name: String,
}

/// Runs the extraction strategies for one account at a time.
pub struct ExtractionChain {
    fetcher: Arc<dyn Fetch>,
    rate_limit: Arc<RateLimitState>,
    endpoints: Endpoints,
}

impl ExtractionChain {
    /// Create a chain over the given fetcher and shared rate-limit flag.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        rate_limit: Arc<RateLimitState>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            fetcher,
            rate_limit,
            endpoints,
        }
    }

    /// Run the fallback chain for `account` and return every address it
    /// produced. An empty result is a normal outcome, never an error:
    /// each strategy degrades to not-found on any failure.
    pub async fn retrieve(&self, account: &Handle) -> Vec<Email> {
        if self.rate_limit.is_tripped() {
            debug!(%account, "skipping metadata strategy: rate limited");
        } else {
            match self.from_metadata(account).await {
                Ok(Some(email)) => return vec![email],
                Ok(None) => {}
                Err(err) => debug!(%account, %err, "metadata strategy failed"),
            }
        }

        match self.from_profile_page(account).await {
            Ok(Some(email)) => return vec![email],
            Ok(None) => {}
            Err(err) => debug!(%account, %err, "profile-page strategy failed"),
        }

        // The flag may have tripped during strategy 1; re-check rather
        // than hammer a service that already rejected us.
        if self.rate_limit.is_tripped() {
            debug!(%account, "skipping activity strategy: rate limited");
            return Vec::new();
        }

        match self.from_activity(account).await {
            Ok(found) => found,
            Err(err) => {
                debug!(%account, %err, "activity strategy failed");
                Vec::new()
            }
        }
    }

    /// Strategy 1: the structured `email` field of the account's public
    /// profile metadata.
    async fn from_metadata(&self, account: &Handle) -> Result<Option<Email>> {
        let body = self.fetcher.fetch(&self.endpoints.metadata(account)).await?;
        let profile: ProfileMetadata = serde_json::from_slice(&body)?;

        Ok(profile
            .email
            .and_then(|address| Email::new(address).ok()))
    }

    /// Strategy 2: the hex-escape-obfuscated contact link on the profile
    /// page. Malformed encodings degrade to not-found.
    async fn from_profile_page(&self, account: &Handle) -> Result<Option<Email>> {
        let body = self.fetcher.fetch(&self.endpoints.profile(account)).await?;
        let text = String::from_utf8_lossy(&body);

        let Some(captures) = MAILTO_RE.captures(&text) else {
            return Ok(None);
        };
        let raw = &captures[1];
        if raw.len() < 3 {
            return Ok(None);
        }

        let decoded = decode_obfuscated_link(raw)?;
        Ok(Email::new(decoded).ok())
    }

    /// Strategy 3: every author address across the commit histories of
    /// the account's most recently updated owned repositories. Collects
    /// all matches rather than stopping at the first.
    async fn from_activity(&self, account: &Handle) -> Result<Vec<Email>> {
        let body = self
            .fetcher
            .fetch(&self.endpoints.repositories(account))
            .await?;
        let repos: Vec<RepoEntry> = serde_json::from_slice(&body)?;

        let mut found = Vec::new();
        for repo in &repos {
            if self.rate_limit.is_tripped() {
                debug!(%account, "stopping commit scans: rate limited");
                break;
            }
            match self.commit_emails(&repo.full_name).await {
                Ok(mut emails) => found.append(&mut emails),
                Err(err) => debug!(repository = %repo.full_name, %err, "commit scan failed"),
            }
        }
        Ok(found)
    }

    async fn commit_emails(&self, full_name: &str) -> Result<Vec<Email>> {
        let body = self.fetcher.fetch(&self.endpoints.commits(full_name)).await?;
        let commits: Value = serde_json::from_slice(&body)?;

        let mut found = Vec::new();
        collect_email_fields(&commits, &mut found);
        Ok(found)
    }
}

/// Decode a hex-escape-obfuscated contact address: strip the escape
/// delimiters, rewrite the hex-escape prefix as a percent-encoding
/// prefix, then percent-decode.
fn decode_obfuscated_link(raw: &str) -> Result<String> {
    let stripped = raw.replace(';', "").replace("&#x", "%");
    urlencoding::decode(&stripped)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| ScanError::Decode(format!("malformed contact link encoding: {err}")))
}

/// Walk arbitrarily nested commit JSON, collecting every string value
/// keyed `email` that parses as a usable address.
fn collect_email_fields(value: &Value, out: &mut Vec<Email>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "email" {
                    if let Some(address) = child.as_str() {
                        if let Ok(email) = Email::new(address) {
                            out.push(email);
                        }
                    }
                }
                collect_email_fields(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_email_fields(item, out);
            }
        }
        _ => {}
    }
}
