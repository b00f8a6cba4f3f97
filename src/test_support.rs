//! Shared test helpers: a scripted mock transport and a recording observer.
//!
//! The mock transport holds a queue of scripted responses per identifier and
//! logs every call, so tests can assert both what the pipeline produced and
//! which upstream operations it issued (and in what order).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::observer::ProgressObserver;
use crate::pager::Page;
use crate::transport::Transport;
use crate::types::{
    AuthorProfile, Comment, Engagement, PostDetail, PostKey, PostMedia, PostSummary, Reply,
    Status, UserRef,
};

/// Observer event captured by [`RecordingObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ObserverEvent {
    Total(u64),
    Completed(u64),
    Status(Status),
}

/// Observer that records every callback in order.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn totals(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObserverEvent::Total(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn completions(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObserverEvent::Completed(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn statuses(&self) -> Vec<Status> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObserverEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Whether every reported completed count was within the latest total
    /// reported before it.
    pub(crate) fn monotonic_consistent(&self) -> bool {
        let mut latest_total = 0u64;
        for event in self.events() {
            match event {
                ObserverEvent::Total(n) => latest_total = n,
                ObserverEvent::Completed(n) => {
                    if n > latest_total {
                        return false;
                    }
                }
                ObserverEvent::Status(_) => {}
            }
        }
        true
    }
}

impl ProgressObserver for RecordingObserver {
    fn set_total(&self, total: u64) {
        self.events.lock().unwrap().push(ObserverEvent::Total(total));
    }

    fn set_completed(&self, completed: u64) {
        self.events
            .lock()
            .unwrap()
            .push(ObserverEvent::Completed(completed));
    }

    fn set_status(&self, status: Status) {
        self.events
            .lock()
            .unwrap()
            .push(ObserverEvent::Status(status));
    }
}

type ResponseQueue<T> = Mutex<HashMap<String, VecDeque<Result<T>>>>;

/// Scripted transport: each call pops the next queued response for its
/// identifier; unscripted calls fail as transport errors.
#[derive(Default)]
pub(crate) struct MockTransport {
    post_details: ResponseQueue<PostDetail>,
    comment_pages: ResponseQueue<Page<Comment>>,
    reply_pages: ResponseQueue<Page<Reply>>,
    profiles: ResponseQueue<AuthorProfile>,
    author_post_pages: ResponseQueue<Page<PostSummary>>,
    search_pages: ResponseQueue<Vec<PostSummary>>,
    media: Mutex<HashMap<String, Vec<u8>>>,
    log: Mutex<Vec<String>>,
}

impl MockTransport {
    pub(crate) fn script_post_detail(&self, post_id: &str, response: Result<PostDetail>) {
        push(&self.post_details, post_id, response);
    }

    pub(crate) fn script_comment_page(&self, post_id: &str, response: Result<Page<Comment>>) {
        push(&self.comment_pages, post_id, response);
    }

    pub(crate) fn script_reply_page(&self, comment_id: &str, response: Result<Page<Reply>>) {
        push(&self.reply_pages, comment_id, response);
    }

    pub(crate) fn script_profile(&self, author_id: &str, response: Result<AuthorProfile>) {
        push(&self.profiles, author_id, response);
    }

    pub(crate) fn script_author_posts(&self, author_id: &str, response: Result<Page<PostSummary>>) {
        push(&self.author_post_pages, author_id, response);
    }

    pub(crate) fn script_search(&self, keyword: &str, response: Result<Vec<PostSummary>>) {
        push(&self.search_pages, keyword, response);
    }

    pub(crate) fn script_media(&self, url: &str, bytes: Vec<u8>) {
        self.media.lock().unwrap().insert(url.to_string(), bytes);
    }

    /// Every call issued so far, as `"operation:identifier"` strings.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, operation: &str) -> usize {
        let prefix = format!("{operation}:");
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    fn record(&self, operation: &str, id: &str) {
        self.log.lock().unwrap().push(format!("{operation}:{id}"));
    }
}

fn push<T>(queue: &ResponseQueue<T>, id: &str, response: Result<T>) {
    queue
        .lock()
        .unwrap()
        .entry(id.to_string())
        .or_default()
        .push_back(response);
}

fn pop<T>(queue: &ResponseQueue<T>, operation: &'static str, id: &str) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .get_mut(id)
        .and_then(|q| q.pop_front())
        .unwrap_or_else(|| Err(Error::transport(operation, format!("unscripted call for '{id}'"))))
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_detail(&self, key: &PostKey) -> Result<PostDetail> {
        self.record("post_detail", &key.id);
        pop(&self.post_details, "post_detail", &key.id)
    }

    async fn comment_page(&self, key: &PostKey, _cursor: &str) -> Result<Page<Comment>> {
        self.record("comment_page", &key.id);
        pop(&self.comment_pages, "comment_page", &key.id)
    }

    async fn reply_page(
        &self,
        _key: &PostKey,
        comment_id: &str,
        _cursor: &str,
        page_size: usize,
    ) -> Result<Page<Reply>> {
        self.record("reply_page", &format!("{comment_id}#{page_size}"));
        pop(&self.reply_pages, "reply_page", comment_id)
    }

    async fn author_profile(&self, author_id: &str) -> Result<AuthorProfile> {
        self.record("author_profile", author_id);
        pop(&self.profiles, "author_profile", author_id)
    }

    async fn author_posts(
        &self,
        author_id: &str,
        _cursor: &str,
        count: usize,
    ) -> Result<Page<PostSummary>> {
        // The requested count is part of the contract (shrinking budget), so
        // record it alongside the id.
        self.record("author_posts", &format!("{author_id}#{count}"));
        pop(&self.author_post_pages, "author_posts", author_id)
    }

    async fn search_posts(
        &self,
        keyword: &str,
        page: usize,
        _page_size: usize,
    ) -> Result<Vec<PostSummary>> {
        // Page numbers are part of the contract, so record them.
        self.record("search_posts", &format!("{keyword}#{page}"));
        pop(&self.search_pages, "search_posts", keyword)
    }

    async fn media_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.record("media_bytes", url);
        self.media
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::transport("media_bytes", format!("unscripted url '{url}'")))
    }
}

// === Entity fixtures ===

pub(crate) fn post_key(id: &str) -> PostKey {
    PostKey {
        id: id.to_string(),
        source: "pc_feed".to_string(),
        token: format!("tok-{id}"),
    }
}

pub(crate) fn user(id: &str) -> UserRef {
    UserRef {
        id: id.to_string(),
        nickname: format!("user-{id}"),
    }
}

pub(crate) fn engagement(likes: &str, collects: &str, comments: &str, shares: &str) -> Engagement {
    Engagement {
        likes: likes.to_string(),
        collects: collects.to_string(),
        comments: comments.to_string(),
        shares: shares.to_string(),
    }
}

pub(crate) fn video_post(id: &str, author_id: &str) -> PostDetail {
    PostDetail {
        id: id.to_string(),
        author: user(author_id),
        title: format!("title-{id}"),
        body: format!("body-{id}"),
        media: PostMedia::Video {
            url: format!("https://cdn.example/{id}.mp4"),
        },
        engagement: engagement("10", "5", "3", "1"),
        published_at: 1_700_000_000_000,
        updated_at: 1_700_000_100_000,
        ip_location: "Shanghai".to_string(),
    }
}

pub(crate) fn gallery_post(id: &str, author_id: &str, image_urls: &[&str]) -> PostDetail {
    PostDetail {
        media: PostMedia::Gallery {
            images: image_urls
                .iter()
                .map(|url| crate::types::ImageAsset {
                    url: url.to_string(),
                    live_video_url: None,
                })
                .collect(),
        },
        ..video_post(id, author_id)
    }
}

pub(crate) fn comment(id: &str, post_id: &str, replies: Vec<Reply>) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        user: user(&format!("u-{id}")),
        content: format!("content-{id}"),
        pictures: vec![],
        created_at: 1_700_000_000_000,
        like_count: "1".to_string(),
        reply_count: replies.len().to_string(),
        ip_location: String::new(),
        has_more_replies: false,
        reply_cursor: String::new(),
        replies,
    }
}

pub(crate) fn reply(id: &str, post_id: &str) -> Reply {
    Reply {
        id: id.to_string(),
        post_id: post_id.to_string(),
        user: user(&format!("u-{id}")),
        content: format!("content-{id}"),
        pictures: vec![],
        created_at: 1_700_000_000_000,
        like_count: "0".to_string(),
        ip_location: String::new(),
        target: None,
    }
}

pub(crate) fn profile(author_id: &str) -> AuthorProfile {
    AuthorProfile {
        id: author_id.to_string(),
        nickname: format!("name-{author_id}"),
        gender: crate::types::Gender::Unknown,
        handle: format!("handle-{author_id}"),
        bio: String::new(),
        follower_count: "1.2万".to_string(),
        reaction_count: "3万".to_string(),
        following_count: "42".to_string(),
        ip_location: "Beijing".to_string(),
        recent_posts: None,
    }
}

pub(crate) fn summary(id: &str, published_at: i64, likes: &str) -> PostSummary {
    PostSummary {
        id: id.to_string(),
        token: format!("tok-{id}"),
        title: format!("title-{id}"),
        published_at,
        engagement: engagement(likes, "0", "0", "0"),
    }
}
