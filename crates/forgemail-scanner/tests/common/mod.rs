#![allow(dead_code)]

use async_trait::async_trait;
use forgemail_core::{Handle, PlatformConfig};
use forgemail_gateway::{Fetch, FetchError, RateLimitState};
use forgemail_scanner::Endpoints;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Canned response for one URL.
pub enum StubResponse {
    Body(String),
    RateLimited,
    Status(u16),
}

/// Fetch stub mapping URLs to canned responses and recording every call.
///
/// Mirrors the real gateway's contract: a rate-limited response trips
/// the shared flag before the error is returned.
pub struct StubFetch {
    responses: HashMap<String, StubResponse>,
    calls: Mutex<Vec<String>>,
    rate_limit: Arc<RateLimitState>,
}

impl StubFetch {
    pub fn new(rate_limit: Arc<RateLimitState>) -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            rate_limit,
        }
    }

    pub fn on(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), StubResponse::Body(body.into()));
        self
    }

    pub fn rate_limited(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), StubResponse::RateLimited);
        self
    }

    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(url.into(), StubResponse::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("acquire calls lock").clone()
    }

    pub fn was_called(&self, url: &str) -> bool {
        self.calls().iter().any(|called| called == url)
    }
}

#[async_trait]
impl Fetch for StubFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls
            .lock()
            .expect("acquire calls lock")
            .push(url.to_string());

        match self.responses.get(url) {
            Some(StubResponse::Body(body)) => Ok(body.clone().into_bytes()),
            Some(StubResponse::RateLimited) => {
                self.rate_limit.trip();
                Err(FetchError::RateLimited { reset: None })
            }
            Some(StubResponse::Status(status)) => Err(FetchError::Status { status: *status }),
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

pub fn endpoints() -> Endpoints {
    Endpoints::new(&PlatformConfig::default())
}

pub fn handle(name: &str) -> Handle {
    Handle::new(name).expect("valid test handle")
}

/// Profile page markup carrying a fully hex-escaped `mailto:` contact
/// link for the given address.
pub fn profile_page_with_mailto(address: &str) -> String {
    let escaped: String = address
        .bytes()
        .map(|byte| format!("&#x{byte:x};"))
        .collect();
    format!(r#"<html><body><a class="u-email" href="mailto:{escaped}">contact</a></body></html>"#)
}
