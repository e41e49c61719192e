//! Snapshot Module
//!
//! On-disk persistence for the cache's entry map.
//!
//! A snapshot is a versioned JSON envelope holding the full entry list.
//! It is written once at shutdown and read once at initialize; the format
//! is an internal detail and is not meant to be portable across versions —
//! a version bump requires manual deletion of the old file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::key::EntryKey;
use crate::cache::kind::CacheKind;

// == Format Version ==
/// Bumped on any change to the envelope or entry layout.
pub(crate) const SNAPSHOT_VERSION: u32 = 1;

// == Snapshot Envelope ==
/// Serialized form of a cache's entry map.
///
/// Entries are stored as a pair list rather than a JSON object so key types
/// other than strings survive the round trip.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<K, V> {
    version: u32,
    kind: String,
    written_at: DateTime<Utc>,
    entries: Vec<(EntryKey<K>, V)>,
}

// == Snapshot Error ==
/// Why a snapshot could not be loaded or written.
#[derive(Debug, Error)]
pub(crate) enum SnapshotError {
    /// No snapshot file at the expected location (normal on first run)
    #[error("snapshot file does not exist")]
    Missing,

    /// The file exists but could not be read or written
    #[error("snapshot file inaccessible: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents do not deserialize
    #[error("snapshot contents unreadable: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The file deserialized but was written by a different format version
    #[error("snapshot format version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

// == Load ==
/// Reads the snapshot at `path`.
///
/// Returns `Ok(None)` for a zero-length placeholder file — the marker left
/// behind by a cold start that was shut down before anything was persisted.
pub(crate) fn load<K, V>(path: &Path) -> Result<Option<Vec<(EntryKey<K>, V)>>, SnapshotError>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(SnapshotError::Missing),
        Err(e) => return Err(SnapshotError::Io(e)),
    };

    if bytes.is_empty() {
        return Ok(None);
    }

    let snapshot: Snapshot<K, V> = serde_json::from_slice(&bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(Some(snapshot.entries))
}

// == Write ==
/// Serializes `entries` to `path`, replacing any previous snapshot.
///
/// Goes through a sibling temp file and a rename, so a crash mid-write
/// leaves the previous snapshot intact rather than a truncated one.
pub(crate) fn write<K, V>(
    path: &Path,
    kind: CacheKind,
    entries: Vec<(EntryKey<K>, V)>,
) -> Result<usize, SnapshotError>
where
    K: Serialize,
    V: Serialize,
{
    let count = entries.len();
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        kind: kind.to_string(),
        written_at: Utc::now(),
        entries,
    };

    let bytes = serde_json::to_vec(&snapshot)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &bytes)?;
    fs::rename(&temp_path, path)?;

    Ok(count)
}

// == Create Placeholder ==
/// Creates the storage directory tree plus an empty placeholder file.
pub(crate) fn create_placeholder(dir: &Path, path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(path, b"")?;
    Ok(())
}
