//! Error types for social-export
//!
//! The pipeline performs no local recovery: every failure is fatal to the
//! current `execute()` call and surfaces verbatim to the caller, which records
//! it as the job's terminal failure. The only retry mechanism is
//! operator-initiated (re-running the job from `Failed`).

use thiserror::Error;

use crate::types::Status;

/// Result type alias for social-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for social-export
#[derive(Debug, Error)]
pub enum Error {
    /// Condition validation failed before or at the first network call for a unit
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the invalid condition
        message: String,
    },

    /// Transport (network) failure, propagated unchanged from the injected transport
    #[error("transport error during {operation}: {message}")]
    Transport {
        /// The upstream operation that failed (e.g. "comment_page")
        operation: &'static str,
        /// Error message from the transport, verbatim
        message: String,
    },

    /// Operation attempted in a lifecycle state that does not permit it
    #[error("cannot {operation} while job is {status:?}")]
    InvalidState {
        /// The operation that was attempted (e.g. "run", "export")
        operation: &'static str,
        /// The job status that prevents the operation
        status: Status,
    },

    /// No task registered for the requested kind
    #[error("unknown task kind: {0}")]
    UnknownTaskKind(String),

    /// Artifact assembly failed (e.g. archive write)
    #[error("export error: {0}")]
    Export(String),

    /// Serialization error (condition decoding in the registry)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a transport error from any displayable cause.
    ///
    /// Concrete transports are expected to funnel every rejected call through
    /// this single constructor so the failure path stays centralized.
    pub fn transport(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        Error::Transport {
            operation,
            message: cause.to_string(),
        }
    }

    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}
