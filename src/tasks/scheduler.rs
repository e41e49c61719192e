//! Maintenance Scheduler Module
//!
//! Owns the timer pool and the fixed-rate schedule for the maintenance
//! worker.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::error::{CacheError, Result};
use crate::tasks::worker::MaintenanceWorker;

// == Maintenance Scheduler ==
/// Schedules one recurring execution of the maintenance worker.
///
/// The scheduler owns a dedicated fixed-size runtime, so a fully synchronous
/// host can use it without providing an async runtime of its own. The worker
/// runs first after `initial_delay`, then at every `period`; [`shutdown`]
/// stops the schedule and waits a bounded interval for in-flight work.
///
/// [`shutdown`]: MaintenanceScheduler::shutdown
pub struct MaintenanceScheduler {
    config: SchedulerConfig,
    worker: Option<Arc<MaintenanceWorker>>,
    runtime: Option<Runtime>,
    task: Option<JoinHandle<()>>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl MaintenanceScheduler {
    // == Constructor ==
    /// Creates a scheduler with the given timing configuration.
    ///
    /// Nothing runs until [`start`](MaintenanceScheduler::start).
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            worker: None,
            runtime: None,
            task: None,
            stop_tx: None,
        }
    }

    // == Builder Methods ==
    /// Supplies the worker to schedule. Required before `start`.
    pub fn with_worker(mut self, worker: MaintenanceWorker) -> Self {
        self.worker = Some(Arc::new(worker));
        self
    }

    // == Start ==
    /// Builds the timer pool and registers the recurring maintenance run.
    ///
    /// # Errors
    /// Fails fast when the timing configuration is invalid, when no worker
    /// has been supplied, when already running, or when the timer pool
    /// cannot be built.
    pub fn start(&mut self) -> Result<()> {
        self.config.validate()?;
        let worker = self
            .worker
            .clone()
            .ok_or_else(|| {
                CacheError::Scheduler(
                    "A maintenance worker is required before startup.".to_string(),
                )
            })?;
        if self.runtime.is_some() {
            return Err(CacheError::Scheduler(
                "The maintenance schedule is already running.".to_string(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(self.config.pool_size)
            .thread_name("cache-maintenance")
            .enable_all()
            .build()
            .map_err(|e| {
                CacheError::Scheduler(format!("The timer pool could not be started: {}", e))
            })?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let initial_delay = self.config.initial_delay;
        let period = self.config.period;

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => worker.run(),
                    _ = stop_rx.changed() => break,
                }
            }
        });

        info!(
            "Cache maintenance scheduled: first run in {:?}, then every {:?}",
            initial_delay, period
        );

        self.runtime = Some(runtime);
        self.task = Some(task);
        self.stop_tx = Some(stop_tx);
        Ok(())
    }

    // == Is Running ==
    /// Whether the schedule is currently active.
    pub fn is_running(&self) -> bool {
        self.runtime.is_some()
    }

    // == Shutdown ==
    /// Stops the schedule and drains the timer pool.
    ///
    /// Signals the recurring task, then waits up to the configured
    /// `shutdown_wait` for it to finish. A timeout or a task failure is
    /// logged and abandoned — never propagated, and remaining work is not
    /// force-killed — so the surrounding process can always finish
    /// terminating. Harmless to call when nothing is running.
    pub fn shutdown(&mut self) {
        let (runtime, task) = match (self.runtime.take(), self.task.take()) {
            (Some(runtime), Some(task)) => (runtime, task),
            _ => {
                debug!("Cache maintenance scheduler was not running");
                return;
            }
        };

        info!("Shutting down the cache maintenance scheduler");
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }

        let wait = self.config.shutdown_wait;
        match runtime.block_on(async { timeout(wait, task).await }) {
            Ok(Ok(())) => info!("Cache maintenance scheduler stopped"),
            Ok(Err(e)) => error!(
                "The maintenance task failed while the scheduler was stopping: {}",
                e
            ),
            Err(_) => error!(
                "The timer pool did not stop within {:?}; in-flight maintenance abandoned",
                wait
            ),
        }
        runtime.shutdown_background();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKind;
    use crate::tasks::worker::ManagedCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::sleep;
    use std::time::Duration;

    struct CountingCache {
        flushes: AtomicUsize,
    }

    impl CountingCache {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                flushes: AtomicUsize::new(0),
            })
        }

        fn flushes(&self) -> usize {
            self.flushes.load(Ordering::SeqCst)
        }
    }

    impl ManagedCache for CountingCache {
        fn kind(&self) -> CacheKind {
            CacheKind::Generic
        }

        fn flush(&self) -> usize {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    fn fast_config() -> SchedulerConfig {
        SchedulerConfig {
            initial_delay: Duration::from_millis(20),
            period: Duration::from_millis(30),
            shutdown_wait: Duration::from_secs(5),
            pool_size: 2,
        }
    }

    #[test]
    fn test_start_requires_a_worker() {
        let mut scheduler = MaintenanceScheduler::new(fast_config());
        assert!(matches!(
            scheduler.start(),
            Err(CacheError::Scheduler(_))
        ));
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let config = SchedulerConfig {
            period: Duration::ZERO,
            ..fast_config()
        };
        let mut scheduler =
            MaintenanceScheduler::new(config).with_worker(MaintenanceWorker::new());
        assert!(scheduler.start().is_err());
    }

    #[test]
    fn test_start_twice_fails_fast() {
        let mut scheduler =
            MaintenanceScheduler::new(fast_config()).with_worker(MaintenanceWorker::new());

        scheduler.start().unwrap();
        assert!(scheduler.start().is_err());
        scheduler.shutdown();
    }

    #[test]
    fn test_worker_runs_on_the_configured_cadence() {
        let cache = CountingCache::new();
        let worker = MaintenanceWorker::new().with_generic_cache(cache.clone());
        let mut scheduler = MaintenanceScheduler::new(fast_config()).with_worker(worker);

        scheduler.start().unwrap();
        assert!(scheduler.is_running());

        // Initial delay 20ms + a few 30ms periods.
        sleep(Duration::from_millis(200));
        scheduler.shutdown();

        assert!(!scheduler.is_running());
        assert!(cache.flushes() >= 2, "got {} flushes", cache.flushes());
    }

    #[test]
    fn test_no_run_before_initial_delay() {
        let cache = CountingCache::new();
        let worker = MaintenanceWorker::new().with_generic_cache(cache.clone());
        let config = SchedulerConfig {
            initial_delay: Duration::from_secs(60),
            ..fast_config()
        };
        let mut scheduler = MaintenanceScheduler::new(config).with_worker(worker);

        scheduler.start().unwrap();
        sleep(Duration::from_millis(100));
        scheduler.shutdown();

        assert_eq!(cache.flushes(), 0);
    }

    #[test]
    fn test_shutdown_without_start_is_harmless() {
        let mut scheduler = MaintenanceScheduler::new(fast_config());
        scheduler.shutdown();
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let mut scheduler =
            MaintenanceScheduler::new(fast_config()).with_worker(MaintenanceWorker::new());
        scheduler.start().unwrap();
        scheduler.shutdown();
        scheduler.shutdown();
    }

    #[test]
    fn test_restart_after_shutdown() {
        let mut scheduler =
            MaintenanceScheduler::new(fast_config()).with_worker(MaintenanceWorker::new());

        scheduler.start().unwrap();
        scheduler.shutdown();
        scheduler.start().unwrap();
        scheduler.shutdown();
    }
}
