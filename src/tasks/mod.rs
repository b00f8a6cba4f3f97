//! Task processors
//!
//! One processor per job kind, each owning its condition, its data map, and
//! its progress estimator for the duration of the job. Processors are
//! sequential by design: unit *i* is fully fetched (or has failed) before
//! unit *i+1* begins, and parents are processed before their children, which
//! keeps the running total meaningful without locks.

pub mod author;
pub mod author_posts;
pub mod comment;
pub mod post;
pub mod search;

use async_trait::async_trait;

use crate::error::Result;
use crate::export::Artifact;

/// Identifies a registered task kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Export post details (and optionally their media)
    Post,
    /// Export the comment tree of posts
    Comment,
    /// Export author profiles (and optionally engagement statistics)
    Author,
    /// Export the recent posts of authors
    AuthorPosts,
    /// Export keyword search results
    Search,
}

impl TaskKind {
    /// Stable string form used by the registry and by embedders.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Post => "post",
            TaskKind::Comment => "comment",
            TaskKind::Author => "author",
            TaskKind::AuthorPosts => "author-posts",
            TaskKind::Search => "search",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "post" => Ok(TaskKind::Post),
            "comment" => Ok(TaskKind::Comment),
            "author" => Ok(TaskKind::Author),
            "author-posts" => Ok(TaskKind::AuthorPosts),
            "search" => Ok(TaskKind::Search),
            other => Err(crate::Error::UnknownTaskKind(other.to_string())),
        }
    }
}

/// A job's processor: drives the fetch sequence and derives export artifacts
/// from the accumulated data map.
#[async_trait]
pub trait TaskProcessor: Send {
    /// The kind this processor implements.
    fn kind(&self) -> TaskKind;

    /// Run the full fetch sequence for every unit in the condition, in the
    /// order supplied.
    ///
    /// Units that yield no data are logged and skipped — the data map is
    /// allowed sparse entries. Any transport failure aborts the call;
    /// already-populated entries are retained for export and for a retry
    /// (which re-runs the whole sequence).
    async fn execute(&mut self) -> Result<()>;

    /// Derive the export artifacts from the data map: exactly one tabular
    /// artifact followed by zero or more media artifacts.
    ///
    /// Pure derivation — never performs network access. Calling it twice on
    /// the same data map yields identical artifacts.
    fn artifacts(&self) -> Result<Vec<Artifact>>;
}

impl std::fmt::Debug for dyn TaskProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcessor")
            .field("kind", &self.kind())
            .finish()
    }
}
