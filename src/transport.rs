//! Transport boundary
//!
//! Every network access the pipeline performs goes through this trait. The
//! concrete implementation (host messaging proxy, signed HTTP client, ...)
//! is injected by the embedding application; the core never retries or backs
//! off — if the transport wants resilience, it implements it itself.

use async_trait::async_trait;

use crate::error::Result;
use crate::pager::Page;
use crate::types::{AuthorProfile, Comment, PostDetail, PostKey, PostSummary, Reply};

/// Typed access to the upstream content API.
///
/// Each method maps to one upstream operation. Failures must surface as
/// [`crate::Error::Transport`] and are propagated verbatim by the pipeline;
/// a rejected call always aborts the running job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the full detail record for one post.
    async fn post_detail(&self, key: &PostKey) -> Result<PostDetail>;

    /// Fetch one page of top-level comments for a post.
    async fn comment_page(&self, key: &PostKey, cursor: &str) -> Result<Page<Comment>>;

    /// Fetch one page of replies under a comment.
    async fn reply_page(
        &self,
        key: &PostKey,
        comment_id: &str,
        cursor: &str,
        page_size: usize,
    ) -> Result<Page<Reply>>;

    /// Fetch an author's profile.
    async fn author_profile(&self, author_id: &str) -> Result<AuthorProfile>;

    /// Fetch one page of an author's posts, requesting at most `count` items.
    async fn author_posts(
        &self,
        author_id: &str,
        cursor: &str,
        count: usize,
    ) -> Result<Page<PostSummary>>;

    /// Fetch one page of keyword search results.
    ///
    /// Search paginates by page number (starting at 1), not by cursor; a
    /// page shorter than `page_size` signals exhaustion.
    async fn search_posts(
        &self,
        keyword: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<PostSummary>>;

    /// Fetch raw media bytes (used only when the condition asks for bundled
    /// media, so that export stays network-free).
    async fn media_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
