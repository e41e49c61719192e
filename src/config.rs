//! Configuration Module
//!
//! Per-instance configuration for caches and the maintenance scheduler.
//!
//! Everything here is explicit and per-instance; no defaults live in shared
//! mutable state. Scheduler timings can also be loaded from environment
//! variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CacheKind, DEFAULT_TTL};
use crate::error::{CacheError, Result};

// == Expiry Policy ==
/// How a maintenance pass decides what to remove. One policy per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Entries older than the TTL are removed on each maintenance pass.
    Ttl(Duration),
    /// A maintenance pass that finds the entry count above the threshold
    /// clears the entire cache. Coarse, all-or-nothing.
    MaxEntries(usize),
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        ExpiryPolicy::Ttl(DEFAULT_TTL)
    }
}

// == Cache Config ==
/// Configuration for a single [`FileCache`](crate::cache::FileCache).
///
/// Defaults place the snapshot at `temp/app_cache/<kind>.json` under the
/// process working directory, with a one-day TTL.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// What category of value the cache stores
    pub kind: CacheKind,
    /// Directory holding the snapshot file
    pub cache_dir: PathBuf,
    /// Snapshot file name within `cache_dir`
    pub cache_file: String,
    /// Expiry policy applied by maintenance passes
    pub policy: ExpiryPolicy,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a configuration with the defaults for `kind`.
    pub fn new(kind: CacheKind) -> Self {
        Self {
            kind,
            cache_dir: PathBuf::from("temp").join("app_cache"),
            cache_file: kind.default_file_name(),
            policy: ExpiryPolicy::default(),
        }
    }

    // == Builder Methods ==
    /// Overrides the snapshot directory.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Overrides the snapshot file name.
    pub fn with_cache_file(mut self, cache_file: impl Into<String>) -> Self {
        self.cache_file = cache_file.into();
        self
    }

    /// Selects the TTL expiry policy.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.policy = ExpiryPolicy::Ttl(ttl);
        self
    }

    /// Selects the size-bound expiry policy.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.policy = ExpiryPolicy::MaxEntries(max_entries);
        self
    }

    // == Location ==
    /// Full path to the snapshot file.
    pub fn location(&self) -> PathBuf {
        self.cache_dir.join(&self.cache_file)
    }

    // == Validation ==
    /// Checks the configuration before a cache is constructed from it.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(CacheError::Config(
                "A cache directory location is required.".to_string(),
            ));
        }
        if self.cache_file.trim().is_empty() {
            return Err(CacheError::Config(
                "A cache filename is required.".to_string(),
            ));
        }
        match self.policy {
            ExpiryPolicy::Ttl(ttl) if ttl.is_zero() => Err(CacheError::Config(
                "TTL must be greater than zero.".to_string(),
            )),
            ExpiryPolicy::MaxEntries(0) => Err(CacheError::Config(
                "Entry threshold must be greater than zero.".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// == Scheduler Config ==
/// Timing parameters for the maintenance scheduler.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay before the first maintenance pass
    pub initial_delay: Duration,
    /// Interval between maintenance passes
    pub period: Duration,
    /// How long shutdown waits for in-flight maintenance work
    pub shutdown_wait: Duration,
    /// Worker threads in the scheduler's timer pool
    pub pool_size: usize,
}

impl SchedulerConfig {
    /// Creates a new SchedulerConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `MAINTENANCE_INITIAL_DELAY` - Seconds before the first pass (default: 60)
    /// - `MAINTENANCE_PERIOD` - Seconds between passes (default: 600)
    /// - `MAINTENANCE_SHUTDOWN_WAIT` - Shutdown wait in seconds (default: 60)
    /// - `MAINTENANCE_POOL_SIZE` - Timer pool threads (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_delay: env::var("MAINTENANCE_INITIAL_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.initial_delay),
            period: env::var("MAINTENANCE_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.period),
            shutdown_wait: env::var("MAINTENANCE_SHUTDOWN_WAIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_wait),
            pool_size: env::var("MAINTENANCE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pool_size),
        }
    }

    // == Validation ==
    pub(crate) fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(CacheError::Config(
                "Maintenance period must be greater than zero.".to_string(),
            ));
        }
        if self.pool_size == 0 {
            return Err(CacheError::Config(
                "Timer pool size must be greater than zero.".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(60),
            period: Duration::from_secs(600),
            shutdown_wait: Duration::from_secs(60),
            pool_size: 10,
        }
    }
}
