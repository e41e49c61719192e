//! Warden Cache - a file-persisted cache for security artifacts
//!
//! Keeps a bounded, time-limited memory of previously validated credentials,
//! user details, CSRF tokens, and arbitrary application objects across
//! process restarts. Each cache is an in-memory concurrent map with a
//! best-effort snapshot on disk: loaded at initialize, written at shutdown,
//! and pruned on a fixed cadence by the maintenance scheduler.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod token;

pub use cache::{CacheKind, CacheStats, CsrfTokenCache, EntryKey, FileCache};
pub use config::{CacheConfig, ExpiryPolicy, SchedulerConfig};
pub use error::{CacheError, Result};
pub use tasks::{MaintenanceScheduler, MaintenanceWorker, ManagedCache};
pub use token::CsrfToken;
