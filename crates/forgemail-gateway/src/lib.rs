//! Forgemail Gateway - bounded-concurrency network fetch layer.
//!
//! All outbound traffic goes through a single [`HttpGateway`]: it
//! acquires a token from the [`ConcurrencyBudget`] before each request,
//! applies the fixed timeout and body-size cap, and watches every
//! response for the platform's rate-limit signals. A detected rate limit
//! trips the shared [`RateLimitState`] once; it never ends the run.
//!
//! The [`Fetch`] trait is the seam between this crate and the scanner:
//! retrieval logic only ever sees `Arc<dyn Fetch>`, so tests can swap in
//! canned responses.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod budget;
pub mod error;
pub mod gateway;
pub mod rate_limit;

// Re-export commonly used types
pub use budget::ConcurrencyBudget;
pub use error::{FetchError, Result};
pub use gateway::{Fetch, HttpGateway};
pub use rate_limit::RateLimitState;
