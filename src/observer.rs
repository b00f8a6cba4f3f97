//! Progress observer boundary
//!
//! The presentation layer supplies an observer and renders whatever the
//! pipeline pushes into it. Calls are fire-and-forget: no return value is
//! consumed by the core, and a slow or absent observer must never stall a job.

use crate::types::Status;

/// Callbacks the pipeline fires at every progress-relevant point.
///
/// Implementations must be cheap and non-blocking; the pipeline calls them
/// synchronously between network suspensions.
pub trait ProgressObserver: Send + Sync {
    /// The running total estimate changed (initial coarse estimate, or a
    /// per-unit correction once a unit's real yield is known).
    fn set_total(&self, total: u64);

    /// The completed count changed.
    fn set_completed(&self, completed: u64);

    /// The job transitioned to a new lifecycle status.
    fn set_status(&self, status: Status);
}

/// Observer that discards all updates. Useful for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn set_total(&self, _total: u64) {}
    fn set_completed(&self, _completed: u64) {}
    fn set_status(&self, _status: Status) {}
}
