//! CSRF Token Module
//!
//! The synchronizer-pattern CSRF token value object stored in a CSRF cache.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Defaults ==
/// Default HTTP header carrying the token
pub const DEFAULT_CSRF_HEADER: &str = "CSRF-TOKEN";

/// Default cookie carrying the token
pub const DEFAULT_CSRF_COOKIE: &str = "X-CSRF-TOKEN";

// == Csrf Token ==
/// A synchronizer-pattern CSRF token.
///
/// The identifier is the first `-`-separated segment of the token value;
/// construction rejects any pair that breaks that relationship. Header and
/// cookie names are per-instance, defaulting to the conventional ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    header_name: String,
    cookie_name: String,
    identifier: String,
    token: String,
}

impl CsrfToken {
    // == Constructor ==
    /// Creates a token after checking the synchronizer relationship.
    ///
    /// # Errors
    /// Rejects an empty identifier or token, and a token whose first
    /// segment is not the identifier.
    pub fn new(identifier: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        let token = token.into();

        if identifier.trim().is_empty() || token.trim().is_empty() {
            return Err(CacheError::InvalidToken(
                "An identifier and a token value are required.".to_string(),
            ));
        }
        if token.split('-').next() != Some(identifier.as_str()) {
            return Err(CacheError::InvalidToken(
                "The specified token doesn't represent a synchronizer pattern.".to_string(),
            ));
        }

        Ok(Self {
            header_name: DEFAULT_CSRF_HEADER.to_string(),
            cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            identifier,
            token,
        })
    }

    // == Builder Methods ==
    /// Overrides the header name the token travels in.
    pub fn with_header_name(mut self, header_name: impl Into<String>) -> Result<Self> {
        let header_name = header_name.into();
        if header_name.trim().is_empty() {
            return Err(CacheError::InvalidToken(
                "A header name is required.".to_string(),
            ));
        }
        self.header_name = header_name;
        Ok(self)
    }

    /// Overrides the cookie name the token travels in.
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Result<Self> {
        let cookie_name = cookie_name.into();
        if cookie_name.trim().is_empty() {
            return Err(CacheError::InvalidToken(
                "A cookie name is required.".to_string(),
            ));
        }
        self.cookie_name = cookie_name;
        Ok(self)
    }

    // == Accessors ==
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Two tokens are the same credential when identifier and value match; the
// transport names are presentation details.
impl PartialEq for CsrfToken {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.token == other.token
    }
}

impl Eq for CsrfToken {}
