//! Author profile export
//!
//! One profile fetch per author. When engagement statistics are requested,
//! each unit additionally collects a bounded sample of the author's most
//! recent posts through the cursor loop; progress then counts sampled posts
//! (units × sample size, rebased to each unit's real yield), otherwise it
//! counts profiles.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{Artifact, Cell, Table};
use crate::observer::ProgressObserver;
use crate::pager::collect_pages;
use crate::progress::Progress;
use crate::stats::{most_recent, sample_average, sample_median, EngagementField};
use crate::tasks::{TaskKind, TaskProcessor};
use crate::transport::Transport;
use crate::types::AuthorProfile;

/// Job parameters for an author export.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorCondition {
    /// Authors to fetch, in export order
    pub author_ids: Vec<String>,
    /// Whether to sample recent posts and append engagement statistics
    #[serde(default)]
    pub include_engagement: bool,
}

/// Fetches author profiles and derives the author table, optionally enriched
/// with engagement statistics over a recent-post sample.
pub struct AuthorTask {
    condition: AuthorCondition,
    config: Config,
    transport: Arc<dyn Transport>,
    progress: Progress,
    data: BTreeMap<String, AuthorProfile>,
}

const BASE_HEADER: [&str; 10] = [
    "author link",
    "author id",
    "nickname",
    "handle",
    "gender",
    "bio",
    "followers",
    "following",
    "reactions",
    "ip location",
];

const STATS_HEADER: [&str; 11] = [
    "sample size",
    "sample from",
    "sample to",
    "median likes",
    "average likes",
    "median comments",
    "average comments",
    "median collects",
    "average collects",
    "median interaction",
    "average interaction",
];

const STAT_FIELDS: [EngagementField; 4] = [
    EngagementField::Likes,
    EngagementField::Comments,
    EngagementField::Collects,
    EngagementField::Interaction,
];

impl AuthorTask {
    /// Create the task. Fails fast on an empty condition.
    pub fn new(
        condition: AuthorCondition,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn ProgressObserver>,
        config: Config,
    ) -> Result<Self> {
        if condition.author_ids.is_empty() {
            return Err(Error::validation("author condition names no authors"));
        }
        Ok(Self {
            condition,
            config,
            transport,
            progress: Progress::new(observer),
            data: BTreeMap::new(),
        })
    }

    fn header(&self) -> Vec<&'static str> {
        let mut header = BASE_HEADER.to_vec();
        if self.condition.include_engagement {
            header.extend(STATS_HEADER);
        }
        header
    }

    fn row_for(&self, profile: &AuthorProfile) -> Vec<Cell> {
        let mut row = vec![
            Cell::text(self.config.author_url(&profile.id)),
            Cell::text(&profile.id),
            Cell::text(&profile.nickname),
            Cell::text(&profile.handle),
            Cell::text(profile.gender.label()),
            Cell::text(&profile.bio),
            Cell::text(&profile.follower_count),
            Cell::text(&profile.following_count),
            Cell::text(&profile.reaction_count),
            Cell::text(&profile.ip_location),
        ];
        if self.condition.include_engagement {
            let sample = profile.recent_posts.as_deref().unwrap_or(&[]);
            row.push(Cell::Int(sample.len() as i64));
            // The sample is ordered most-recent-first.
            row.push(
                sample
                    .last()
                    .map(|p| Cell::time_millis(p.published_at))
                    .unwrap_or(Cell::Empty),
            );
            row.push(
                sample
                    .first()
                    .map(|p| Cell::time_millis(p.published_at))
                    .unwrap_or(Cell::Empty),
            );
            for field in STAT_FIELDS {
                row.push(Cell::Int(sample_median(sample, field)));
                row.push(Cell::Int(sample_average(sample, field)));
            }
        }
        row
    }
}

#[async_trait]
impl TaskProcessor for AuthorTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Author
    }

    async fn execute(&mut self) -> Result<()> {
        let condition = &self.condition;
        let config = &self.config;
        let transport = &self.transport;
        let progress = &mut self.progress;
        let data = &mut self.data;

        let units = condition.author_ids.len();

        if !condition.include_engagement {
            progress.start(units as u64);
            for author_id in &condition.author_ids {
                tracing::debug!(author_id = %author_id, "fetching author profile");
                let profile = transport.author_profile(author_id).await?;
                data.insert(author_id.clone(), profile);
                progress.add_completed(1);
            }
            return Ok(());
        }

        let sample_target = config.engagement_sample_size;
        let page_size = sample_target.min(config.author_posts_page_size);
        progress.start((units * sample_target) as u64);
        let mut offset = 0u64;

        for author_id in &condition.author_ids {
            tracing::debug!(author_id = %author_id, "fetching author profile and post sample");
            let mut profile = transport.author_profile(author_id).await?;

            let posts = collect_pages(sample_target, offset, progress, |cursor| async move {
                transport.author_posts(author_id, &cursor, page_size).await
            })
            .await?;

            let real_yield = posts.len();
            if real_yield == 0 {
                tracing::debug!(author_id = %author_id, "author has no posts to sample");
            }
            profile.recent_posts = Some(most_recent(posts, sample_target));

            progress.rebase_unit(sample_target as u64, real_yield as u64);
            offset += real_yield as u64;
            data.insert(author_id.clone(), profile);
        }

        Ok(())
    }

    fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut table = Table::new("authors", self.header());
        for author_id in &self.condition.author_ids {
            let Some(profile) = self.data.get(author_id) else {
                tracing::debug!(author_id = %author_id, "no data for author, skipping row");
                continue;
            };
            table.push_row(self.row_for(profile));
        }
        Ok(vec![Artifact::Table(table)])
    }
}
