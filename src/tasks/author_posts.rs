//! Author post-list export
//!
//! Per author: a cursor loop over the author's posts that shrinks the
//! requested page size as the per-author limit approaches, then a single
//! profile call per unit (not per post) to label the rows. Progress is
//! rebased to each unit's real yield, so the reported total converges on the
//! true post count as units finish.

use std::collections::BTreeMap;
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
use crate::types::{PostKey, PostSummary, UserRef};

/// Job parameters for an author post-list export.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorPostsCondition {
    /// Authors whose posts to fetch, in export order
    pub author_ids: Vec<String>,
    /// Target number of posts per author
    pub limit_per_author: usize,
}

struct AuthorEntry {
    author: UserRef,
    posts: Vec<PostSummary>,
}

/// Fetches each author's recent post list and derives the post-list table.
pub struct AuthorPostsTask {
    condition: AuthorPostsCondition,
    config: Config,
    transport: Arc<dyn Transport>,
    progress: Progress,
    data: BTreeMap<String, AuthorEntry>,
}

const AUTHOR_POSTS_HEADER: [&str; 10] = [
    "post link",
    "post id",
    "author id",
    "author nickname",
    "title",
    "likes",
    "collects",
    "comments",
    "shares",
    "published at",
];

impl AuthorPostsTask {
    /// Create the task. Fails fast on an empty condition or a zero limit.
    pub fn new(
        condition: AuthorPostsCondition,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Self> {
        if condition.author_ids.is_empty() {
            return Err(Error::validation("author-posts condition names no authors"));
        }
        if condition.limit_per_author == 0 {
            return Err(Error::validation("limit_per_author must be at least 1"));
        }
        Ok(Self {
            condition,
            config,
            transport,
            progress: Progress::new(observer),
            data: BTreeMap::new(),
        })
    }

    fn summary_url(&self, post: &PostSummary) -> String {
        if post.token.is_empty() {
            self.config.bare_post_url(&post.id)
        } else {
            self.config.post_url(&PostKey {
                id: post.id.clone(),
                source: "pc_user".to_string(),
                token: post.token.clone(),
            })
        }
    }

    fn row_for(&self, author: &UserRef, post: &PostSummary) -> Vec<Cell> {
        vec![
            Cell::text(self.summary_url(post)),
            Cell::text(&post.id),
            Cell::text(&author.id),
            Cell::text(&author.nickname),
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
impl TaskProcessor for AuthorPostsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::AuthorPosts
    }

    async fn execute(&mut self) -> Result<()> {
        let condition = &self.condition;
        let config = &self.config;
        let transport = &self.transport;
        let progress = &mut self.progress;
        let data = &mut self.data;

        let limit = condition.limit_per_author;
        progress.start((condition.author_ids.len() * limit) as u64);
        let mut offset = 0u64;

        for author_id in &condition.author_ids {
            tracing::debug!(author_id = %author_id, "fetching author posts");

            // The requested count shrinks with the remaining budget, so the
            // final page never asks for more than is still wanted.
            let mut posts: Vec<PostSummary> = Vec::new();
            let mut cursor = String::new();
            loop {
                let want = (limit - posts.len()).min(config.author_posts_page_size);
                let page = transport.author_posts(author_id, &cursor, want).await?;
                let page_len = page.items.len();
                posts.extend(page.items);
                progress.set_completed(offset + posts.len() as u64);
                cursor = page.cursor;
                // An empty page cannot make progress, whatever has_more
                // claims.
                if posts.len() >= limit || !page.has_more || page_len == 0 {
                    break;
                }
            }

            let real_yield = posts.len();
            if real_yield == 0 {
                tracing::debug!(author_id = %author_id, "author has no posts, skipping");
                progress.rebase_unit(limit as u64, 0);
                continue;
            }

            // One enrichment call per unit, never per post.
            let profile = transport.author_profile(author_id).await?;
            data.insert(
                author_id.clone(),
                AuthorEntry {
                    author: UserRef {
                        id: profile.id,
                        nickname: profile.nickname,
                    },
                    posts,
                },
            );

            progress.rebase_unit(limit as u64, real_yield as u64);
            offset += real_yield as u64;
        }

        Ok(())
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut table = Table::new("author posts", AUTHOR_POSTS_HEADER.to_vec());
        for author_id in &self.condition.author_ids {
            let Some(entry) = self.data.get(author_id) else {
                tracing::debug!(author_id = %author_id, "no data for author, skipping rows");
                continue;
            };
            for post in &entry.posts {
                table.push_row(self.row_for(&entry.author, post));
            }
        }
        Ok(vec![Artifact::Table(table)])
    }
}
