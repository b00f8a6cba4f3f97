//! Keyword search export
//!
//! Unlike the cursor-driven tasks, search paginates by page number and runs
//! against a fixed target: the condition's `total` is the final total (never
//! rebased), pages are requested until enough results arrived or a short
//! page signals exhaustion, and the overshoot of the last page is truncated
//! away so the data never exceeds the target.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{Artifact, Cell, Table};
use crate::observer::ProgressObserver;
use crate::progress::Progress;
use crate::tasks::{TaskKind, TaskProcessor};
use crate::transport::Transport;
use crate::types::{PostKey, PostSummary};

/// Job parameters for a search export.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchCondition {
    /// Search keyword
    pub keyword: String,
    /// Exact number of results to collect (the fixed progress total)
    pub total: usize,
    /// Results requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

/// Fetches keyword search results and derives the result table.
pub struct SearchTask {
    condition: SearchCondition,
    config: Config,
    transport: Arc<dyn Transport>,
    progress: Progress,
    data: Vec<PostSummary>,
}

const SEARCH_HEADER: [&str; 8] = [
    "post link",
    "post id",
    "title",
    "likes",
    "collects",
    "comments",
    "shares",
    "published at",
];

impl SearchTask {
    /// Create the task. Fails fast on a blank keyword or a zero target.
    pub fn new(
        condition: SearchCondition,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Self> {
        if condition.keyword.trim().is_empty() {
            return Err(Error::validation("search condition has a blank keyword"));
        }
        if condition.total == 0 {
            return Err(Error::validation("total must be at least 1"));
        }
        if condition.page_size == 0 {
            return Err(Error::validation("page_size must be at least 1"));
        }
        Ok(Self {
            condition,
            config,
            transport,
            progress: Progress::new(observer),
            data: Vec::new(),
        })
    }

    fn summary_url(&self, post: &PostSummary) -> String {
        if post.token.is_empty() {
            self.config.bare_post_url(&post.id)
        } else {
            self.config.post_url(&PostKey {
                id: post.id.clone(),
                source: "pc_search".to_string(),
                token: post.token.clone(),
            })
        }
    }

    fn row_for(&self, post: &PostSummary) -> Vec<Cell> {
        vec![
            Cell::text(self.summary_url(post)),
            Cell::text(&post.id),
            Cell::text(&post.title),
            Cell::text(&post.engagement.likes),
            Cell::text(&post.engagement.collects),
            Cell::text(&post.engagement.comments),
            Cell::text(&post.engagement.shares),
            Cell::time_millis(post.published_at),
        ]
    }
}

#[async_trait]
impl TaskProcessor for SearchTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Search
    }

    async fn execute(&mut self) -> Result<()> {
        let condition = &self.condition;
        let transport = &self.transport;
        let progress = &mut self.progress;
        let data = &mut self.data;

        // A retry re-runs the whole search rather than appending to it.
        data.clear();

        let total = condition.total;
        progress.start(total as u64);
        tracing::debug!(keyword = %condition.keyword, total, "searching posts");

        let mut page = 1usize;
        loop {
            let batch = transport
                .search_posts(&condition.keyword, page, condition.page_size)
                .await?;
            let batch_len = batch.len();
            data.extend(batch);

            // The total is fixed, so the reported completed count is capped
            // at it even while the raw accumulator briefly overshoots.
            progress.set_completed((data.len() as u64).min(total as u64));

            if data.len() >= total {
                break;
            }
            if batch_len < condition.page_size {
                tracing::debug!(
                    keyword = %condition.keyword,
                    found = data.len(),
                    "search exhausted before reaching the target"
                );
                break;
            }
            page += 1;
        }

        data.truncate(total);
        Ok(())
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut table = Table::new("search results", SEARCH_HEADER.to_vec());
        for post in &self.data {
            table.push_row(self.row_for(post));
        }
        Ok(vec![Artifact::Table(table)])
    }
}
