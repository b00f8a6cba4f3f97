//! Post detail export
//!
//! One detail fetch per post key. Export is the post table plus, when the
//! condition asks for media, one artifact per asset (or a single archive per
//! post once it carries enough assets to be worth grouping). Archive bytes
//! are fetched while the job executes so artifact assembly stays off the
//! network.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{bundle_archive, Artifact, Cell, MediaArtifact, Table};
use crate::observer::ProgressObserver;
use crate::progress::Progress;
use crate::tasks::{TaskKind, TaskProcessor};
use crate::transport::Transport;
use crate::types::{PostDetail, PostKey, PostMedia};

/// Job parameters for a post export.
#[derive(Clone, Debug, Deserialize)]
pub struct PostCondition {
    /// Posts to fetch, in export order
    pub posts: Vec<PostKey>,
    /// Whether to emit media artifacts alongside the table
    #[serde(default)]
    pub include_media: bool,
    /// Whether multi-asset posts should arrive as one archive instead of
    /// individual files
    #[serde(default)]
    pub bundle_media: bool,
}

struct PostEntry {
    detail: PostDetail,
    /// Pre-fetched archive entries, populated only when bundling applies.
    bundled_assets: Vec<(String, Vec<u8>)>,
}

/// Fetches full post details and derives the post table and media artifacts.
pub struct PostTask {
    condition: PostCondition,
    config: Config,
    transport: Arc<dyn Transport>,
    progress: Progress,
    data: BTreeMap<String, PostEntry>,
}

const POST_HEADER: [&str; 15] = [
    "post link",
    "post id",
    "author id",
    "author nickname",
    "title",
    "body",
    "media kind",
    "image count",
    "likes",
    "collects",
    "comments",
    "shares",
    "published at",
    "updated at",
    "ip location",
];

/// `(filename, url)` pairs for every downloadable asset of a post.
///
/// A video post yields its single video; a gallery yields one image per slot
/// plus the live-photo companion video where present. File names embed the
/// title and post id so a directory of exports stays self-describing.
fn media_files(detail: &PostDetail) -> Vec<(String, String)> {
    let stem = format!("{}-{}", detail.title, detail.id);
    match &detail.media {
        PostMedia::Video { url } => vec![(format!("{stem}.mp4"), url.clone())],
        PostMedia::Gallery { images } => {
            let mut files = Vec::with_capacity(images.len());
            for (index, image) in images.iter().enumerate() {
                let n = index + 1;
                files.push((format!("{stem}-图{n}.png"), image.url.clone()));
                if let Some(live_url) = &image.live_video_url {
                    files.push((format!("{stem}-图{n}.mp4"), live_url.clone()));
                }
            }
            files
        }
    }
}

impl PostTask {
    /// Create the task. Fails fast on an empty condition.
    pub fn new(
        condition: PostCondition,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Self> {
        if condition.posts.is_empty() {
            return Err(Error::validation("post condition names no posts"));
        }
        Ok(Self {
            condition,
            config,
            transport,
            progress: Progress::new(observer),
            data: BTreeMap::new(),
        })
    }

    fn row_for(&self, key: &PostKey, entry: &PostEntry) -> Vec<Cell> {
        let detail = &entry.detail;
        let (media_kind, image_count) = match &detail.media {
            PostMedia::Video { .. } => ("video", Cell::Empty),
            PostMedia::Gallery { images } => ("gallery", Cell::Int(images.len() as i64)),
        };
        vec![
            Cell::text(self.config.post_url(key)),
            Cell::text(&detail.id),
            Cell::text(&detail.author.id),
            Cell::text(&detail.author.nickname),
            Cell::text(&detail.title),
            Cell::text(&detail.body),
            Cell::text(media_kind),
            image_count,
            Cell::text(&detail.engagement.likes),
            Cell::text(&detail.engagement.collects),
            Cell::text(&detail.engagement.comments),
            Cell::text(&detail.engagement.shares),
            Cell::time_millis(detail.published_at),
            Cell::time_millis(detail.updated_at),
            Cell::text(&detail.ip_location),
        ]
    }

    fn media_artifacts_for(&self, entry: &PostEntry) -> Result<Vec<Artifact>> {
        let detail = &entry.detail;
        if !entry.bundled_assets.is_empty() {
            let stem = format!("{}-{}", detail.title, detail.id);
            let archive = bundle_archive(format!("{stem}.zip"), &entry.bundled_assets)?;
            return Ok(vec![Artifact::Media(archive)]);
        }
        Ok(media_files(detail)
            .into_iter()
            .map(|(name, url)| Artifact::Media(MediaArtifact::url(name, url)))
            .collect())
    }
}

#[async_trait]
impl TaskProcessor for PostTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Post
    }

    async fn execute(&mut self) -> Result<()> {
        self.progress.start(self.condition.posts.len() as u64);

        for key in &self.condition.posts {
            tracing::debug!(post_id = %key.id, "fetching post detail");
            let detail = self.transport.post_detail(key).await?;

            let mut bundled_assets = Vec::new();
            if self.condition.include_media && self.condition.bundle_media {
                let files = media_files(&detail);
                if files.len() >= self.config.media_bundle_threshold {
                    for (name, url) in files {
                        let bytes = self.transport.media_bytes(&url).await?;
                        bundled_assets.push((name, bytes));
                    }
                }
            }

            self.data.insert(
                key.id.clone(),
                PostEntry {
                    detail,
                    bundled_assets,
                },
            );
            self.progress.add_completed(1);
        }

        Ok(())
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut table = Table::new("posts", POST_HEADER.to_vec());
        let mut media = Vec::new();

        for key in &self.condition.posts {
            let Some(entry) = self.data.get(&key.id) else {
                tracing::debug!(post_id = %key.id, "no data for post, skipping row");
                continue;
            };
            table.push_row(self.row_for(key, entry));
            if self.condition.include_media {
                media.extend(self.media_artifacts_for(entry)?);
            }
        }

        let mut artifacts = vec![Artifact::Table(table)];
        artifacts.extend(media);
        Ok(artifacts)
    }
}
