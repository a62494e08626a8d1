//! Deduplicating, thread-safe store of discovered addresses.

use forgemail_core::Email;
use std::collections::HashSet;
use std::sync::Mutex;

/// Shared registry of every address accepted so far in the run.
///
/// `try_insert` is the single atomic check-and-insert step: of two tasks
/// racing to insert the same address, exactly one wins. Addresses ending
/// in the platform's no-reply suffix are auto-generated privacy
/// placeholders and are rejected before the set is consulted at all.
#[derive(Debug)]
pub struct AddressRegistry {
    /// Stored lowercased; matched case-insensitively against addresses
    noreply_suffix: String,
    seen: Mutex<HashSet<Email>>,
}

impl AddressRegistry {
    /// Create an empty registry with the given placeholder suffix.
    #[must_use]
    pub fn new(noreply_suffix: impl Into<String>) -> Self {
        Self {
            noreply_suffix: noreply_suffix.into().to_ascii_lowercase(),
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Record an address. Returns `true` iff it was newly inserted and
    /// should be emitted; placeholder addresses and repeats return
    /// `false`.
    pub fn try_insert(&self, address: &Email) -> bool {
        if self.is_placeholder(address) {
            return false;
        }

        self.seen
            .lock()
            .expect("acquire registry lock")
            .insert(address.clone())
    }

    fn is_placeholder(&self, address: &Email) -> bool {
        address
            .as_str()
            .to_ascii_lowercase()
            .ends_with(&self.noreply_suffix)
    }

    /// Number of accepted addresses so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().expect("acquire registry lock").len()
    }

    /// Whether nothing has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The final address set, sorted for deterministic output.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Email> {
        let mut addresses: Vec<Email> = self
            .seen
            .lock()
            .expect("acquire registry lock")
            .iter()
            .cloned()
            .collect();
        addresses.sort();
        addresses
    }
}
