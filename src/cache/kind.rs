//! Cache Kind Module
//!
//! The closed set of cache categories supported out of the box.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Cache Kind ==
/// Identifies what category of value a cache instance stores.
///
/// The kind is purely descriptive: it drives the default snapshot file name
/// and log text, nothing else. Expiry policy and value type are chosen
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKind {
    /// Authentication/authorization artifacts (tokens, decisions)
    Credential,
    /// Resolved user-detail objects
    UserDetail,
    /// CSRF tokens
    CsrfToken,
    /// Anything else the host wants a bounded memory of
    Generic,
}

impl CacheKind {
    // == As Str ==
    /// Returns the lowercase name used in file names and log messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Credential => "credential",
            CacheKind::UserDetail => "user_detail",
            CacheKind::CsrfToken => "csrf_token",
            CacheKind::Generic => "generic",
        }
    }

    // == Default File Name ==
    /// Default snapshot file name for this kind.
    pub fn default_file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
