//! Fixed-capacity token pool bounding simultaneous in-flight fetches.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity pool of fetch tokens.
///
/// One token is acquired before every outbound request and held for the
/// duration of the fetch. The token is released when the returned permit
/// is dropped, on every exit path.
///
/// The pool bounds network concurrency, not total scheduled tasks: any
/// number of tasks may be waiting on a token at once.
#[derive(Debug, Clone)]
pub struct ConcurrencyBudget {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyBudget {
    /// Create a pool with the given capacity (clamped to at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// The fixed capacity of the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Wait for a token. The token is returned to the pool when the
    /// permit is dropped.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .expect("budget semaphore is never closed")
    }
}
