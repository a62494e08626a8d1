//! Forgemail Core - Foundation crate for the forgemail tool.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the other forgemail crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Handle`, `Email`, `Relation`)
//!
//! # Example
//!
//! ```rust
//! use forgemail_core::{AppConfig, Handle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let seed = Handle::new("octocat")?;
//! assert_eq!(seed.as_str(), "octocat");
//! assert_eq!(config.network.max_concurrent, 4);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, NetworkConfig, PlatformConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{Discovery, Email, Handle, Relation, RelationPage};
