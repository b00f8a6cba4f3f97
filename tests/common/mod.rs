//! Shared helpers for the end-to-end pipeline tests: a scripted transport and
//! a recording observer built purely against the public API.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use social_export::{
    AuthorProfile, Comment, Engagement, Error, Gender, Page, PostDetail, PostKey, PostSummary,
    ProgressObserver, Reply, Result, Status, Transport,
};

/// Observer that records every callback in order.
#[derive(Default)]
pub struct RecordingObserver {
    pub totals: Mutex<Vec<u64>>,
    pub completions: Mutex<Vec<u64>>,
    pub statuses: Mutex<Vec<Status>>,
}

impl ProgressObserver for RecordingObserver {
    fn set_total(&self, total: u64) {
        self.totals.lock().unwrap().push(total);
    }

    fn set_completed(&self, completed: u64) {
        self.completions.lock().unwrap().push(completed);
    }

    fn set_status(&self, status: Status) {
        self.statuses.lock().unwrap().push(status);
    }
}

type ResponseQueue<T> = Mutex<HashMap<String, VecDeque<Result<T>>>>;

/// Transport whose responses are scripted per identifier; unscripted calls
/// fail as transport errors.
#[derive(Default)]
pub struct ScriptedTransport {
    comment_pages: ResponseQueue<Page<Comment>>,
    reply_pages: ResponseQueue<Page<Reply>>,
    profiles: ResponseQueue<AuthorProfile>,
    author_post_pages: ResponseQueue<Page<PostSummary>>,
    search_pages: ResponseQueue<Vec<PostSummary>>,
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

impl ScriptedTransport {
    pub fn script_comment_page(&self, post_id: &str, response: Result<Page<Comment>>) {
        push(&self.comment_pages, post_id, response);
    }

    pub fn script_reply_page(&self, comment_id: &str, response: Result<Page<Reply>>) {
        push(&self.reply_pages, comment_id, response);
    }

    pub fn script_profile(&self, author_id: &str, response: Result<AuthorProfile>) {
        push(&self.profiles, author_id, response);
    }

    pub fn script_author_posts(&self, author_id: &str, response: Result<Page<PostSummary>>) {
        push(&self.author_post_pages, author_id, response);
    }

    pub fn script_search(&self, keyword: &str, response: Result<Vec<PostSummary>>) {
        push(&self.search_pages, keyword, response);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_detail(&self, key: &PostKey) -> Result<PostDetail> {
        Err(Error::transport("post_detail", format!("unscripted call for '{}'", key.id)))
    }

    async fn comment_page(&self, key: &PostKey, _cursor: &str) -> Result<Page<Comment>> {
        pop(&self.comment_pages, "comment_page", &key.id)
    }

    async fn reply_page(
        &self,
        _key: &PostKey,
        comment_id: &str,
        _cursor: &str,
        _page_size: usize,
    ) -> Result<Page<Reply>> {
        pop(&self.reply_pages, "reply_page", comment_id)
    }

    async fn author_profile(&self, author_id: &str) -> Result<AuthorProfile> {
        pop(&self.profiles, "author_profile", author_id)
    }

    async fn author_posts(
        &self,
        author_id: &str,
        _cursor: &str,
        _count: usize,
    ) -> Result<Page<PostSummary>> {
        pop(&self.author_post_pages, "author_posts", author_id)
    }

    async fn search_posts(
        &self,
        keyword: &str,
        _page: usize,
        _page_size: usize,
    ) -> Result<Vec<PostSummary>> {
        pop(&self.search_pages, "search_posts", keyword)
    }

    async fn media_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::transport("media_bytes", format!("unscripted url '{url}'")))
    }
}

pub fn profile(author_id: &str) -> AuthorProfile {
    AuthorProfile {
        id: author_id.to_string(),
        nickname: format!("name-{author_id}"),
        gender: Gender::Unknown,
        handle: format!("handle-{author_id}"),
        bio: String::new(),
        follower_count: "1.2万".to_string(),
        reaction_count: "3000".to_string(),
        following_count: "42".to_string(),
        ip_location: "Beijing".to_string(),
        recent_posts: None,
    }
}

pub fn summary(id: &str, published_at: i64, likes: &str) -> PostSummary {
    PostSummary {
        id: id.to_string(),
        token: format!("tok-{id}"),
        title: format!("title-{id}"),
        published_at,
        engagement: Engagement {
            likes: likes.to_string(),
            collects: "0".to_string(),
            comments: "0".to_string(),
            shares: "0".to_string(),
        },
    }
}

pub fn post_key(id: &str) -> PostKey {
    PostKey {
        id: id.to_string(),
        source: "pc_feed".to_string(),
        token: format!("tok-{id}"),
    }
}

pub fn comment(id: &str, post_id: &str) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        user: social_export::UserRef {
            id: format!("u-{id}"),
            nickname: format!("user-{id}"),
        },
        content: format!("content-{id}"),
        pictures: vec![],
        created_at: 1_700_000_000_000,
        like_count: "1".to_string(),
        reply_count: "0".to_string(),
        ip_location: String::new(),
        has_more_replies: false,
        reply_cursor: String::new(),
        replies: vec![],
    }
}
