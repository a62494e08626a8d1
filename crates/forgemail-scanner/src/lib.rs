//! Forgemail Scanner - concurrent contact-address retrieval.
//!
//! This crate is the retrieval engine: an ordered fallback chain of
//! extraction strategies per account, a deduplicating address registry,
//! one-hop social graph expansion, and the orchestrator that drives a
//! run from scheduling through draining to done.
//!
//! # Example
//!
//! ```rust,ignore
//! use forgemail_scanner::{
//!     AddressRegistry, Endpoints, ExtractionChain, GraphExpander, Orchestrator, RunMode,
//! };
//! use std::sync::Arc;
//!
//! let chain = Arc::new(ExtractionChain::new(gateway.clone(), rate_limit, endpoints.clone()));
//! let registry = Arc::new(AddressRegistry::new("@users.noreply.github.com"));
//! let expander = GraphExpander::new(gateway, endpoints);
//! let orchestrator = Orchestrator::new(chain, registry, expander, RunMode::Addresses, events);
//!
//! let summary = orchestrator.run(seed, None, 1).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod chain;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod registry;
pub mod urls;

// Re-export commonly used types
pub use chain::ExtractionChain;
pub use error::{Result, ScanError};
pub use graph::GraphExpander;
pub use orchestrator::{Orchestrator, RunMode, RunSummary};
pub use registry::AddressRegistry;
pub use urls::Endpoints;
