//! Shared types used across the forgemail crates.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for account handles on the code-hosting platform.
///
/// Handles are opaque identifiers: the only hard requirement is that they
/// are non-empty. Equality is exact string match with no case-folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(String);

impl Handle {
    /// Create a new `Handle` from a string.
    ///
    /// # Errors
    /// Returns error if the handle is empty.
    pub fn new(handle: impl Into<String>) -> Result<Self, CoreError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(CoreError::Validation(
                "account handle must not be empty".to_string(),
            ));
        }
        Ok(Self(handle))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for discovered email addresses.
///
/// An address must be at least 3 characters (the shortest possible form
/// is `x@y`) and contain an `@`. Uniqueness across a run is enforced by
/// the address registry, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new `Email` from a string.
    ///
    /// # Errors
    /// Returns error if the address is shorter than 3 characters or does
    /// not contain an `@`.
    pub fn new(address: impl Into<String>) -> Result<Self, CoreError> {
        let address = address.into();
        if address.len() < 3 || !address.contains('@') {
            return Err(CoreError::Validation(format!(
                "not a usable email address: '{address}'"
            )));
        }
        Ok(Self(address))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the one-hop social graph expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Accounts that follow the seed account
    Followers,
    /// Accounts the seed account follows
    Following,
}

impl Relation {
    /// URL path segment for the relation listing page.
    #[must_use]
    pub fn as_segment(&self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_segment())
    }
}

/// One page of a relation listing: the peer handles scraped from it, in
/// page order, plus the page number used to fetch it.
#[derive(Debug, Clone)]
pub struct RelationPage {
    /// Peer handles in the order they appear on the page
    pub handles: Vec<Handle>,
    /// Page number the listing was fetched with
    pub page: u32,
}

/// A single item discovered during a run, streamed to the output sink as
/// soon as it is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// A deduplicated email address
    Address(Email),
    /// A peer handle (handles-only mode)
    Peer(Handle),
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(email) => write!(f, "{email}"),
            Self::Peer(handle) => write!(f, "{handle}"),
        }
    }
}
