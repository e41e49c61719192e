//! Cache Module
//!
//! The file-backed cache engine and its supporting types.

use std::time::Duration;

mod key;
mod kind;
mod snapshot;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use key::{current_timestamp_ms, EntryKey};
pub use kind::CacheKind;
pub use stats::CacheStats;
pub use store::FileCache;

use crate::token::CsrfToken;

// == Public Constants ==
/// Default time-to-live for cached entries under the TTL policy
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60); // 1 day

/// Default entry threshold under the size-bound policy
pub const DEFAULT_MAX_ENTRIES: usize = 640;

// == Typed Aliases ==
/// The usual shape of a CSRF cache: synchronizer tokens keyed by session id.
pub type CsrfTokenCache = FileCache<String, CsrfToken>;
