//! # social-export
//!
//! Backend library for batch-exporting paginated social content into tabular
//! reports and media bundles.
//!
//! ## Design Philosophy
//!
//! social-export is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Transport-agnostic** - All network access goes through an injected
//!   [`Transport`] trait; the host supplies the HTTP client and signing
//! - **Observable** - Progress and lifecycle transitions stream to an
//!   injected [`ProgressObserver`], no polling required
//! - **Failure-preserving** - A failed job keeps everything fetched so far
//!   exportable; retry re-runs the full sequence
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use social_export::{Config, Job, NoopObserver, TaskKind, TaskRegistry, Transport};
//!
//! async fn export(transport: Arc<dyn Transport>) -> social_export::Result<()> {
//!     let registry = TaskRegistry::with_builtin_tasks();
//!     let observer = Arc::new(NoopObserver);
//!     let processor = registry.build(
//!         TaskKind::Author,
//!         json!({"author_ids": ["5ff0e6410000000001008400"], "include_engagement": true}),
//!         transport,
//!         observer.clone(),
//!         Config::default(),
//!     )?;
//!
//!     let mut job = Job::new(processor, observer);
//!     job.run().await?;
//!     let artifacts = job.artifacts()?;
//!     // hand `artifacts` to a DownloadSink
//!     # let _ = artifacts;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Pipeline tuning configuration
pub mod config;
/// Error types
pub mod error;
/// Export artifact assembly
pub mod export;
/// Job lifecycle state machine
pub mod job;
/// Progress observer boundary
pub mod observer;
/// Cursor-based page collection
pub mod pager;
/// Progress estimation
pub mod progress;
/// Task kind registry
pub mod registry;
/// Engagement statistics
pub mod stats;
/// Task processors, one per job kind
pub mod tasks;
/// Transport boundary
pub mod transport;
/// Core entity types
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use export::{Artifact, Cell, DownloadSink, MediaArtifact, MediaPayload, Table};
pub use job::Job;
pub use observer::{NoopObserver, ProgressObserver};
pub use pager::Page;
pub use registry::{TaskBuilder, TaskRegistry};
pub use tasks::{TaskKind, TaskProcessor};
pub use transport::Transport;
pub use types::{
    AuthorProfile, Comment, CommentNode, Engagement, Gender, ImageAsset, PostDetail, PostKey,
    PostMedia, PostSummary, Reply, ReplyTarget, Status, UserRef,
};
