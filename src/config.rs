//! Pipeline configuration
//!
//! Job parameters (identifiers, limits, media flags) live in each task's
//! condition; this config carries only cross-task tuning knobs and the web
//! link base used for the URL columns of tabular exports.

use serde::{Deserialize, Serialize};

use crate::types::PostKey;

/// Tuning knobs shared by all task processors.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page size requested from the reply endpoint
    pub reply_page_size: usize,

    /// Largest item count requested per author-posts page
    pub author_posts_page_size: usize,

    /// Number of recent posts sampled for engagement statistics
    pub engagement_sample_size: usize,

    /// Minimum number of media assets before a post's media is grouped into
    /// a single archive (when the condition requests bundling)
    pub media_bundle_threshold: usize,

    /// Base URL used to build the canonical web links in export rows
    pub web_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reply_page_size: 10,
            author_posts_page_size: 18,
            engagement_sample_size: 10,
            media_bundle_threshold: 2,
            web_base_url: "https://www.xiaohongshu.com".to_string(),
        }
    }
}

impl Config {
    /// Canonical web link for a post, carrying the access token the platform
    /// expects back.
    pub fn post_url(&self, key: &PostKey) -> String {
        format!(
            "{}/explore/{}?xsec_token={}&xsec_source={}",
            self.web_base_url, key.id, key.token, key.source
        )
    }

    /// Canonical web link for a bare post id (no access token available).
    pub fn bare_post_url(&self, post_id: &str) -> String {
        format!("{}/explore/{}", self.web_base_url, post_id)
    }

    /// Canonical web link for an author profile.
    pub fn author_url(&self, author_id: &str) -> String {
        format!("{}/user/profile/{}", self.web_base_url, author_id)
    }
}
