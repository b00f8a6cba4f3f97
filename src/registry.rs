//! Task registry
//!
//! Maps a task kind to a constructor that decodes the JSON condition and
//! builds the boxed processor with the injected transport and observer.
//! Wiring is explicit: the built-in set is registered at startup and
//! embedders may add their own kinds-to-builders on top.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::observer::ProgressObserver;
use crate::tasks::author::AuthorTask;
use crate::tasks::author_posts::AuthorPostsTask;
use crate::tasks::comment::CommentTask;
use crate::tasks::post::PostTask;
use crate::tasks::search::SearchTask;
use crate::tasks::{TaskKind, TaskProcessor};
use crate::transport::Transport;

/// Constructor for one task kind: decodes the condition and builds the
/// processor.
pub type TaskBuilder = Box<
    dyn Fn(
            Value,
            Arc<dyn Transport>,
            Arc<dyn ProgressObserver>,
            Config,
        ) -> Result<Box<dyn TaskProcessor>>
        + Send
        + Sync,
>;

/// Registry of available task kinds.
pub struct TaskRegistry {
    builders: HashMap<TaskKind, TaskBuilder>,
}

impl TaskRegistry {
    /// Empty registry, for embedders wiring a custom set.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry with every built-in task kind registered.
    pub fn with_builtin_tasks() -> Self {
        let mut registry = Self::new();
        registry.register(
            TaskKind::Post,
            Box::new(|condition, transport, observer, config| {
                let condition = serde_json::from_value(condition)?;
                Ok(Box::new(PostTask::new(condition, transport, observer, config)?))
            }),
        );
        registry.register(
            TaskKind::Comment,
            Box::new(|condition, transport, observer, config| {
                let condition = serde_json::from_value(condition)?;
                Ok(Box::new(CommentTask::new(condition, transport, observer, config)?))
            }),
        );
        registry.register(
            TaskKind::Author,
            Box::new(|condition, transport, observer, config| {
                let condition = serde_json::from_value(condition)?;
                Ok(Box::new(AuthorTask::new(condition, transport, observer, config)?))
            }),
        );
        registry.register(
            TaskKind::AuthorPosts,
            Box::new(|condition, transport, observer, config| {
                let condition = serde_json::from_value(condition)?;
                Ok(Box::new(AuthorPostsTask::new(
                    condition, transport, observer, config,
                )?))
            }),
        );
        registry.register(
            TaskKind::Search,
            Box::new(|condition, transport, observer, config| {
                let condition = serde_json::from_value(condition)?;
                Ok(Box::new(SearchTask::new(condition, transport, observer, config)?))
            }),
        );
        registry
    }

    /// Register (or replace) the builder for a kind.
    pub fn register(&mut self, kind: TaskKind, builder: TaskBuilder) {
        self.builders.insert(kind, builder);
    }

    /// Build a processor for the given kind and JSON condition.
    pub fn build(
        &self,
        kind: TaskKind,
        condition: Value,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Box<dyn TaskProcessor>> {
        let builder = self
            .builders
            .get(&kind)
            .ok_or_else(|| Error::UnknownTaskKind(kind.to_string()))?;
        builder(condition, transport, observer, config)
    }

    /// [`Self::build`] with the kind given as its string form, as embedders
    /// typically receive it.
    pub fn build_from_str(
        &self,
        kind: &str,
        condition: Value,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Box<dyn TaskProcessor>> {
        self.build(TaskKind::from_str(kind)?, condition, transport, observer, config)
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::with_builtin_tasks()
    }
}
