//! Cache Store Module
//!
//! The file-backed cache engine: a concurrent in-memory map governed by an
//! expiry policy, warmed from a snapshot at initialize and persisted back at
//! shutdown.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::key::{current_timestamp_ms, EntryKey};
use crate::cache::kind::CacheKind;
use crate::cache::snapshot::{self, SnapshotError};
use crate::cache::stats::CacheStats;
use crate::config::{CacheConfig, ExpiryPolicy};
use crate::error::Result;

// == File Cache ==
/// A process-local, file-persisted cache for one category of value.
///
/// The entry map is internally synchronized; every operation takes `&self`
/// and is safe to call from any number of threads, including concurrently
/// with a maintenance [`flush`](FileCache::flush). The read and write paths
/// never fail — the snapshot on disk is a warm-start optimization, not a
/// source of truth.
#[derive(Debug)]
pub struct FileCache<K, V> {
    /// Descriptive tag, used for defaults and log text
    kind: CacheKind,
    /// Expiry policy applied by maintenance passes
    policy: ExpiryPolicy,
    /// Directory holding the snapshot file
    cache_dir: PathBuf,
    /// Full path to the snapshot file
    location: PathBuf,
    /// Key-value storage
    entries: RwLock<HashMap<EntryKey<K>, V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> FileCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + Serialize + DeserializeOwned,
    V: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates an empty cache from `config`.
    ///
    /// Validates the configuration and nothing else; no file I/O happens
    /// until [`initialize`](FileCache::initialize).
    ///
    /// # Errors
    /// Returns a configuration error for an empty directory or file name, a
    /// zero TTL, or a zero entry threshold.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kind: config.kind,
            policy: config.policy,
            location: config.location(),
            cache_dir: config.cache_dir,
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::new(),
        })
    }

    // == Kind Constructors ==
    /// Creates a credential cache with the defaults for its kind.
    pub fn credential() -> Result<Self> {
        Self::new(CacheConfig::new(CacheKind::Credential))
    }

    /// Creates a user-detail cache with the defaults for its kind.
    pub fn user_detail() -> Result<Self> {
        Self::new(CacheConfig::new(CacheKind::UserDetail))
    }

    /// Creates a CSRF token cache with the defaults for its kind.
    pub fn csrf_token() -> Result<Self> {
        Self::new(CacheConfig::new(CacheKind::CsrfToken))
    }

    /// Creates a generic cache with the defaults for its kind.
    pub fn generic() -> Result<Self> {
        Self::new(CacheConfig::new(CacheKind::Generic))
    }

    // == Initialize ==
    /// Warms the cache from its snapshot file.
    ///
    /// Every failure mode degrades to an empty cache: a missing file is
    /// expected on first run (the storage directory tree and an empty
    /// placeholder file are created), an unreadable or corrupt file is
    /// flagged as possible tampering, and a format-version mismatch asks for
    /// manual deletion. None of them prevent the cache from becoming ready,
    /// and calling this again is harmless.
    pub fn initialize(&self) {
        match snapshot::load::<K, V>(&self.location) {
            Ok(Some(loaded)) => {
                let mut entries = self.entries.write();
                let count = loaded.len();
                for (key, value) in loaded {
                    entries.entry(key).or_insert(value);
                }
                info!("{} cache warmed with {} persisted entries", self.kind, count);
            }
            Ok(None) => {
                debug!("{} cache placeholder is empty, starting cold", self.kind);
            }
            Err(SnapshotError::Missing) => {
                info!("{} cache doesn't exist, creating a brand new one", self.kind);
                if let Err(e) = snapshot::create_placeholder(&self.cache_dir, &self.location) {
                    error!("{} cache storage could not be created: {}", self.kind, e);
                }
            }
            Err(e @ SnapshotError::Io(_)) | Err(e @ SnapshotError::Malformed(_)) => {
                warn!(
                    "{} cache snapshot is unreadable and may have been tampered with; starting cold: {}",
                    self.kind, e
                );
            }
            Err(e @ SnapshotError::VersionMismatch { .. }) => {
                error!(
                    "{} cache was persisted by a different format version; delete the snapshot and restart: {}",
                    self.kind, e
                );
            }
        }
    }

    // == Get ==
    /// Retrieves the value cached under `identifier`, if any.
    ///
    /// Pure lookup; never fails. Expiry is applied only by maintenance
    /// passes, so an over-age entry remains visible until the next flush.
    pub fn get(&self, identifier: &K) -> Option<V> {
        let probe = EntryKey::new(identifier.clone());
        let found = self.entries.read().get(&probe).cloned();
        match found {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Caches `value` under `identifier` if nothing is cached there yet.
    ///
    /// First writer wins: a put on an existing key is a silent no-op, so a
    /// concurrent re-validation cannot replace an already-cached artifact
    /// with a staler one. The entry keeps the creation time of its first
    /// insertion for TTL purposes.
    pub fn put(&self, identifier: K, value: V) {
        self.entries
            .write()
            .entry(EntryKey::new(identifier))
            .or_insert(value);
    }

    // == Evict ==
    /// Removes the entry under `identifier`; no-op when absent.
    pub fn evict(&self, identifier: &K) {
        self.entries.write().remove(&EntryKey::new(identifier.clone()));
    }

    // == Contains ==
    /// Checks for the presence of `identifier` with no side effects.
    pub fn contains(&self, identifier: &K) -> bool {
        self.entries
            .read()
            .contains_key(&EntryKey::new(identifier.clone()))
    }

    // == Flush ==
    /// Runs one maintenance pass, applying the expiry policy.
    ///
    /// Under a TTL policy, removes every entry older than the TTL. Under a
    /// size-bound policy, clears the whole cache when the entry count sits
    /// above the threshold. Returns how many entries were removed. Never
    /// fails, and is safe to run concurrently with the read/write paths.
    pub fn flush(&self) -> usize {
        let removed = match self.policy {
            ExpiryPolicy::Ttl(ttl) => {
                let cutoff = current_timestamp_ms().saturating_sub(ttl.as_millis() as u64);
                let mut entries = self.entries.write();
                let before = entries.len();
                entries.retain(|key, _| key.created_at() >= cutoff);
                before - entries.len()
            }
            ExpiryPolicy::MaxEntries(max_entries) => {
                let mut entries = self.entries.write();
                if entries.len() > max_entries {
                    let count = entries.len();
                    entries.clear();
                    count
                } else {
                    0
                }
            }
        };

        if removed > 0 {
            self.stats.record_removed(removed as u64);
            debug!("{} cache maintenance removed {} entries", self.kind, removed);
        }
        removed
    }

    // == Shutdown ==
    /// Persists the current entry map to the snapshot file.
    ///
    /// Overwrites any prior snapshot. A persistence failure costs only the
    /// warm start after the next launch, so it is logged and swallowed —
    /// process shutdown must never be blocked by the cache.
    pub fn shutdown(&self) {
        let entries: Vec<(EntryKey<K>, V)> = self
            .entries
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        match snapshot::write(&self.location, self.kind, entries) {
            Ok(count) => info!("{} cache persisted {} entries", self.kind, count),
            Err(e) => warn!(
                "{} cache could not be persisted, entries will be lost on restart: {}",
                self.kind, e
            ),
        }
    }

    // == Accessors ==
    /// The cache's kind tag.
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// The expiry policy in force.
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Full path of the snapshot file.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Performance counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
