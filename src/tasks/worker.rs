//! Maintenance Worker Module
//!
//! One unit of periodic work: flush every cache it was configured with.

use std::hash::Hash;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheKind, FileCache};

// == Managed Cache ==
/// The maintenance-facing view of a cache.
///
/// Object-safe so one worker can hold engines with differing key and value
/// types behind a single handle type.
pub trait ManagedCache: Send + Sync {
    /// The cache's kind tag, for log text.
    fn kind(&self) -> CacheKind;

    /// Runs one maintenance pass; returns how many entries were removed.
    fn flush(&self) -> usize;
}

impl<K, V> ManagedCache for FileCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    fn kind(&self) -> CacheKind {
        FileCache::kind(self)
    }

    fn flush(&self) -> usize {
        FileCache::flush(self)
    }
}

// == Maintenance Worker ==
/// Flushes a small fixed set of caches when run.
///
/// Holds nothing but its cache handles and performs no I/O of its own; a
/// handle that was never supplied is skipped, not an error.
#[derive(Default)]
pub struct MaintenanceWorker {
    credential_cache: Option<Arc<dyn ManagedCache>>,
    user_cache: Option<Arc<dyn ManagedCache>>,
    csrf_cache: Option<Arc<dyn ManagedCache>>,
    generic_cache: Option<Arc<dyn ManagedCache>>,
}

impl MaintenanceWorker {
    // == Constructor ==
    /// Creates a worker with no cache handles.
    pub fn new() -> Self {
        Self::default()
    }

    // == Builder Methods ==
    /// Supplies the credential cache handle.
    pub fn with_credential_cache(mut self, cache: Arc<dyn ManagedCache>) -> Self {
        self.credential_cache = Some(cache);
        self
    }

    /// Supplies the user-detail cache handle.
    pub fn with_user_cache(mut self, cache: Arc<dyn ManagedCache>) -> Self {
        self.user_cache = Some(cache);
        self
    }

    /// Supplies the CSRF token cache handle.
    pub fn with_csrf_cache(mut self, cache: Arc<dyn ManagedCache>) -> Self {
        self.csrf_cache = Some(cache);
        self
    }

    /// Supplies the generic cache handle.
    pub fn with_generic_cache(mut self, cache: Arc<dyn ManagedCache>) -> Self {
        self.generic_cache = Some(cache);
        self
    }

    // == Run ==
    /// Runs one maintenance batch over every configured cache.
    pub fn run(&self) {
        info!("Commencing cache maintenance pass");

        let handles = [
            &self.credential_cache,
            &self.user_cache,
            &self.csrf_cache,
            &self.generic_cache,
        ];
        for cache in handles.into_iter().flatten() {
            let removed = cache.flush();
            if removed > 0 {
                info!("{} cache: removed {} entries", cache.kind(), removed);
            } else {
                debug!("{} cache: nothing to remove", cache.kind());
            }
        }

        info!("Cache maintenance pass completed");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCache {
        kind: CacheKind,
        flushes: AtomicUsize,
    }

    impl CountingCache {
        fn new(kind: CacheKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                flushes: AtomicUsize::new(0),
            })
        }

        fn flushes(&self) -> usize {
            self.flushes.load(Ordering::SeqCst)
        }
    }

    impl ManagedCache for CountingCache {
        fn kind(&self) -> CacheKind {
            self.kind
        }

        fn flush(&self) -> usize {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[test]
    fn test_run_flushes_every_configured_cache() {
        let credential = CountingCache::new(CacheKind::Credential);
        let user = CountingCache::new(CacheKind::UserDetail);
        let csrf = CountingCache::new(CacheKind::CsrfToken);
        let generic = CountingCache::new(CacheKind::Generic);

        let worker = MaintenanceWorker::new()
            .with_credential_cache(credential.clone())
            .with_user_cache(user.clone())
            .with_csrf_cache(csrf.clone())
            .with_generic_cache(generic.clone());

        worker.run();
        worker.run();

        assert_eq!(credential.flushes(), 2);
        assert_eq!(user.flushes(), 2);
        assert_eq!(csrf.flushes(), 2);
        assert_eq!(generic.flushes(), 2);
    }

    #[test]
    fn test_run_skips_missing_handles() {
        let csrf = CountingCache::new(CacheKind::CsrfToken);
        let worker = MaintenanceWorker::new().with_csrf_cache(csrf.clone());

        worker.run();

        assert_eq!(csrf.flushes(), 1);
    }

    #[test]
    fn test_run_with_no_handles_is_harmless() {
        MaintenanceWorker::new().run();
    }

    #[test]
    fn test_worker_accepts_real_engines() {
        let cache: Arc<FileCache<String, String>> =
            Arc::new(FileCache::generic().unwrap());
        cache.put("key".to_string(), "value".to_string());

        let worker = MaintenanceWorker::new().with_generic_cache(cache.clone());
        worker.run();

        // Young entry under the default day-long TTL survives the pass.
        assert!(cache.contains(&"key".to_string()));
    }
}
