//! Comment tree export
//!
//! Per post: a cursor loop over top-level comments measured by total comment
//! count (nested replies included), then a reply fetcher that spends the
//! unit's remaining budget parent by parent, shrinking the requested page
//! size as the budget runs down and stopping the moment it is spent. The
//! budget is a target, not a hard cap: the last page of a parent may push a
//! unit over by at most one page, and the progress rebase absorbs the real
//! yield either way.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{Artifact, Cell, MediaArtifact, Table};
use crate::observer::ProgressObserver;
use crate::pager::collect_pages_with;
use crate::progress::Progress;
use crate::tasks::{TaskKind, TaskProcessor};
use crate::transport::Transport;
use crate::types::{Comment, CommentNode, PostKey};

/// Job parameters for a comment export.
#[derive(Clone, Debug, Deserialize)]
pub struct CommentCondition {
    /// Posts whose comment trees to fetch, in export order
    pub posts: Vec<PostKey>,
    /// Target number of comment nodes (comments plus replies) per post
    pub limit_per_post: usize,
    /// Whether to emit comment picture artifacts alongside the table
    #[serde(default)]
    pub include_media: bool,
}

/// Fetches comment trees and derives the comment table and picture artifacts.
pub struct CommentTask {
    condition: CommentCondition,
    config: Config,
    transport: Arc<dyn Transport>,
    progress: Progress,
    data: BTreeMap<String, Vec<Comment>>,
}

const COMMENT_HEADER: [&str; 14] = [
    "post link",
    "post id",
    "kind",
    "id",
    "parent comment id",
    "user id",
    "user nickname",
    "content",
    "pictures",
    "likes",
    "replies",
    "created at",
    "ip location",
    "replied-to user",
];

/// Comment nodes accumulated so far: top-level comments plus every reply
/// already attached to them. This is the measure the unit budget counts.
fn comment_count(comments: &[Comment]) -> usize {
    comments.iter().map(|c| 1 + c.replies.len()).sum()
}

impl CommentTask {
    /// Create the task. Fails fast on an empty condition or a zero limit.
    pub fn new(
        condition: CommentCondition,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Self> {
        if condition.posts.is_empty() {
            return Err(Error::validation("comment condition names no posts"));
        }
        if condition.limit_per_post == 0 {
            return Err(Error::validation("limit_per_post must be at least 1"));
        }
        Ok(Self {
            condition,
            config,
            transport,
            progress: Progress::new(observer),
            data: BTreeMap::new(),
        })
    }

    fn node_row(&self, key: &PostKey, node: CommentNode<'_>, parent: Option<&Comment>) -> Vec<Cell> {
        let (kind, pictures, created_at, like_count, ip_location) = match node {
            CommentNode::Comment(c) => ("comment", &c.pictures, c.created_at, &c.like_count, &c.ip_location),
            CommentNode::Reply(r) => ("reply", &r.pictures, r.created_at, &r.like_count, &r.ip_location),
        };
        let reply_count = match node {
            CommentNode::Comment(c) => Cell::text(&c.reply_count),
            CommentNode::Reply(_) => Cell::Empty,
        };
        let replied_to = match node {
            CommentNode::Reply(r) => r
                .target
                .as_ref()
                .map(|t| Cell::text(&t.user.nickname))
                .unwrap_or(Cell::Empty),
            CommentNode::Comment(_) => Cell::Empty,
        };
        vec![
            Cell::text(self.config.post_url(key)),
            Cell::text(&key.id),
            Cell::text(kind),
            Cell::text(node.id()),
            parent.map(|p| Cell::text(&p.id)).unwrap_or(Cell::Empty),
            Cell::text(&node.user().id),
            Cell::text(&node.user().nickname),
            match node {
                CommentNode::Comment(c) => Cell::text(&c.content),
                CommentNode::Reply(r) => Cell::text(&r.content),
            },
            Cell::text(pictures.join("\n")),
            Cell::text(like_count),
            reply_count,
            Cell::time_millis(created_at),
            Cell::text(ip_location),
            replied_to,
        ]
    }

    fn picture_artifacts(node: CommentNode<'_>, post_id: &str, out: &mut Vec<Artifact>) {
        let pictures = match node {
            CommentNode::Comment(c) => &c.pictures,
            CommentNode::Reply(r) => &r.pictures,
        };
        for (index, url) in pictures.iter().enumerate() {
            let filename = format!("{}-pic{}.png", node.id(), index + 1);
            out.push(Artifact::Media(MediaArtifact::url_in_dir(
                filename, post_id, url,
            )));
        }
    }
}

#[async_trait]
impl TaskProcessor for CommentTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Comment
    }

    async fn execute(&mut self) -> Result<()> {
        let condition = &self.condition;
        let config = &self.config;
        let transport = &self.transport;
        let progress = &mut self.progress;
        let data = &mut self.data;

        let limit = condition.limit_per_post;
        progress.start((condition.posts.len() * limit) as u64);
        let mut offset = 0u64;

        for key in &condition.posts {
            tracing::debug!(post_id = %key.id, "fetching comment tree");

            let mut comments = collect_pages_with(
                limit,
                offset,
                progress,
                comment_count,
                |cursor| async move { transport.comment_page(key, &cursor).await },
            )
            .await?;

            let mut fetched = comment_count(&comments);

            // Spend the remaining budget on replies, parent by parent.
            // Checked before every fetch so a satisfied budget never issues
            // another call.
            for comment in comments.iter_mut() {
                if fetched >= limit {
                    break;
                }
                if !comment.has_more_replies {
                    continue;
                }
                let mut cursor = comment.reply_cursor.clone();
                loop {
                    let want = (limit - fetched).min(config.reply_page_size);
                    let page = transport.reply_page(key, &comment.id, &cursor, want).await?;
                    let page_len = page.items.len();
                    fetched += page_len;
                    comment.replies.extend(page.items);
                    progress.set_completed(offset + fetched as u64);
                    cursor = page.cursor;
                    // An empty page cannot make progress, whatever has_more
                    // claims.
                    if fetched >= limit || !page.has_more || page_len == 0 {
                        break;
                    }
                }
            }

            if comments.is_empty() {
                tracing::debug!(post_id = %key.id, "post has no comments");
            }

            progress.rebase_unit(limit as u64, fetched as u64);
            offset += fetched as u64;
            data.insert(key.id.clone(), comments);
        }

        Ok(())
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut table = Table::new("comments", COMMENT_HEADER.to_vec());
        let mut media = Vec::new();

        for key in &self.condition.posts {
            let Some(comments) = self.data.get(&key.id) else {
                tracing::debug!(post_id = %key.id, "no data for post, skipping rows");
                continue;
            };
            for comment in comments {
                table.push_row(self.node_row(key, CommentNode::Comment(comment), None));
                if self.condition.include_media {
                    Self::picture_artifacts(CommentNode::Comment(comment), &key.id, &mut media);
                }
                for reply in &comment.replies {
                    table.push_row(self.node_row(key, CommentNode::Reply(reply), Some(comment)));
                    if self.condition.include_media {
                        Self::picture_artifacts(CommentNode::Reply(reply), &key.id, &mut media);
                    }
                }
            }
        }

        let mut artifacts = vec![Artifact::Table(table)];
        artifacts.extend(media);
        Ok(artifacts)
    }
}
