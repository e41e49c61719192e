//! Tasks Module
//!
//! Periodic cache maintenance: the worker that flushes a set of caches and
//! the scheduler that runs it on a fixed cadence.

mod scheduler;
mod worker;

pub use scheduler::MaintenanceScheduler;
pub use worker::{MaintenanceWorker, ManagedCache};
