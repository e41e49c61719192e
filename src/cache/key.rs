//! Cache Key Module
//!
//! Defines the lookup handle for cached values with creation-time metadata.

use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Entry Key ==
/// The unique lookup handle for a cached value.
///
/// Pairs a caller-supplied identifier with the instant the entry was
/// inserted. Equality and hashing consider the identifier alone, so a key
/// regenerated from the same identifier at any later time lands on the same
/// map slot. The creation time is read only by the TTL expiry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryKey<K> {
    /// Opaque caller-supplied identifier
    identifier: K,
    /// Creation timestamp (Unix milliseconds)
    created_at: u64,
}

impl<K> EntryKey<K> {
    // == Constructor ==
    /// Creates a key for `identifier`, stamped with the current time.
    pub fn new(identifier: K) -> Self {
        Self {
            identifier,
            created_at: current_timestamp_ms(),
        }
    }

    // == Identifier ==
    /// Returns the caller-supplied identifier.
    pub fn identifier(&self) -> &K {
        &self.identifier
    }

    // == Created At ==
    /// Returns the creation timestamp in Unix milliseconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns the key's age in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at)
    }
}

// Identity is the identifier alone; creation time is expiry metadata and
// must not influence lookups.
impl<K: PartialEq> PartialEq for EntryKey<K> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl<K: Eq> Eq for EntryKey<K> {}

impl<K: Hash> Hash for EntryKey<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
