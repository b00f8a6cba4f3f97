//! Progress estimation
//!
//! Multi-unit jobs start with a coarse total (`units × per-unit target`) and
//! replace each unit's placeholder contribution with its real yield as soon as
//! it is known. The reported total therefore moves during execution; that is
//! the intended behavior, not drift.

use std::sync::Arc;

use crate::observer::ProgressObserver;

/// Running `(completed, total)` estimate for one job.
///
/// Owned by the task processor; updates are pushed to the observer
/// immediately after each page or unit result, never batched.
pub struct Progress {
    completed: u64,
    total: u64,
    observer: Arc<dyn ProgressObserver>,
}

impl Progress {
    /// Create an estimator bound to an observer. Counters start at zero.
    pub fn new(observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            completed: 0,
            total: 0,
            observer,
        }
    }

    /// Reset both counters for a fresh run and push the coarse total.
    ///
    /// Called at the top of `execute()`, including retries.
    pub fn start(&mut self, total: u64) {
        self.total = total;
        self.completed = 0;
        self.observer.set_total(total);
        self.observer.set_completed(0);
    }

    /// Report an absolute completed count (used by the cursor loop, which
    /// re-derives the count from its accumulator after every page).
    pub fn set_completed(&mut self, completed: u64) {
        self.completed = completed;
        self.observer.set_completed(completed);
    }

    /// Add to the completed count.
    pub fn add_completed(&mut self, delta: u64) {
        self.set_completed(self.completed + delta);
    }

    /// Replace one unit's placeholder contribution with its real yield:
    /// `total += yield − target`.
    ///
    /// The revised total is pushed before any completed catch-up so the
    /// observer never sees `completed > total` after a revision that follows
    /// it. The total never drops below the already-completed count.
    pub fn rebase_unit(&mut self, per_unit_target: u64, real_yield: u64) {
        let revised = (self.total + real_yield).saturating_sub(per_unit_target);
        self.total = revised.max(self.completed);
        self.observer.set_total(self.total);
    }

    /// Current completed count.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Current total estimate.
    pub fn total(&self) -> u64 {
        self.total
    }
}
