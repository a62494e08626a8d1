//! Process-wide rate-limit flag shared across retrieval tasks.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag recording that the rate-limited service has rejected us.
///
/// The flag starts clear, transitions clear→tripped at most once per run
/// and never reverts. Strategies that depend on the rate-limited service
/// check it and skip themselves once it is tripped; nothing else about
/// the run changes.
///
/// This is passed by `Arc` into every task that needs it, never held in
/// a global.
#[derive(Debug, Default)]
pub struct RateLimitState {
    tripped: AtomicBool,
}

impl RateLimitState {
    /// Create a fresh, clear flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as rate limited. Returns `true` only for the
    /// call that performed the clear→tripped transition.
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::SeqCst)
    }

    /// Whether the rate limit has been hit this run.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
