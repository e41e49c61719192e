//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only lifecycle operations can fail: configuration validation before a
//! cache becomes ready, scheduler startup preconditions, and CSRF token
//! construction. The read/write/maintenance paths (`get`, `put`, `evict`,
//! `contains`, `flush`) are best-effort by contract and never return errors.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Required configuration is missing or invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Scheduler startup precondition not met
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// CSRF token value failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
