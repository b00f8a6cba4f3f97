//! Job lifecycle
//!
//! A job wraps one task processor and gates its operations behind the
//! lifecycle state machine: `Initial → Executing → {Completed, Failed}`,
//! `Failed → Executing` on retry, any state back to `Initial` on reset.
//! Every transition is pushed to the observer.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::export::Artifact;
use crate::observer::ProgressObserver;
use crate::tasks::{TaskKind, TaskProcessor};
use crate::types::Status;

/// One user-initiated export job.
pub struct Job {
    processor: Box<dyn TaskProcessor>,
    status: Status,
    observer: Arc<dyn ProgressObserver>,
    last_error: Option<String>,
}

impl Job {
    /// Wrap a processor. The job starts in [`Status::Initial`].
    pub fn new(processor: Box<dyn TaskProcessor>, observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            processor,
            status: Status::Initial,
            observer,
            last_error: None,
        }
    }

    /// The kind of the wrapped task.
    pub fn kind(&self) -> TaskKind {
        self.processor.kind()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Message of the error that failed the last run, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run the job to a terminal state.
    ///
    /// Valid from `Initial` or `Failed` (retry, which re-runs the full fetch
    /// sequence). The error that fails a run is recorded and returned
    /// verbatim; data fetched before the failure stays exportable.
    pub async fn run(&mut self) -> Result<()> {
        if !self.status.can_start() {
            return Err(Error::InvalidState {
                operation: "run",
                status: self.status,
            });
        }

        self.set_status(Status::Executing);
        tracing::info!(kind = %self.processor.kind(), "job started");

        match self.processor.execute().await {
            Ok(()) => {
                self.last_error = None;
                self.set_status(Status::Completed);
                tracing::info!(kind = %self.processor.kind(), "job completed");
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.set_status(Status::Failed);
                tracing::error!(kind = %self.processor.kind(), error = %err, "job failed");
                Err(err)
            }
        }
    }

    /// Derive the export artifacts from the job's data.
    ///
    /// Valid from `Completed` or, for partial results, `Failed`.
    pub fn artifacts(&self) -> Result<Vec<Artifact>> {
        if !self.status.is_terminal() {
            return Err(Error::InvalidState {
                operation: "export",
                status: self.status,
            });
        }
        self.processor.artifacts()
    }

    /// Return to `Initial`, as when the observing dialog is dismissed.
    ///
    /// Does not clear the processor's data: artifacts already handed to the
    /// download sink are unaffected, and the job instance is expected to be
    /// discarded rather than reused.
    pub fn reset(&mut self) {
        self.last_error = None;
        self.set_status(Status::Initial);
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.observer.set_status(status);
    }
}
