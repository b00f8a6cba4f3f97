//! Core types for social-export
//!
//! Entity shapes mirror the upstream content APIs closely enough that a
//! concrete transport can deserialize response JSON straight into them.
//! Numeric engagement counts stay as locale-formatted strings (e.g. "1.2万")
//! until export time; see [`crate::stats::parse_count`].

use serde::{Deserialize, Serialize};

/// Job lifecycle status.
///
/// Transitions: `Initial → Executing → {Completed, Failed}`,
/// `Failed → Executing` on retry, any state `→ Initial` on reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Created, not yet started (or reset by the observer layer)
    #[default]
    Initial,
    /// `execute()` is running
    Executing,
    /// Finished successfully; artifacts available
    Completed,
    /// Terminated by an error; partial artifacts still available
    Failed,
}

impl Status {
    /// Whether a job in this state may (re)start executing.
    pub fn can_start(&self) -> bool {
        matches!(self, Status::Initial | Status::Failed)
    }

    /// Whether the job has reached a terminal state for this run.
    ///
    /// Terminal states keep the data map readable, so exporting partial
    /// results after a failure is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }
}

/// Composite canonical identifier for a post, produced by the external
/// identifier resolver. The pipeline treats it as opaque and never
/// re-validates its format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostKey {
    /// Post id (map key for the job's data map)
    pub id: String,
    /// Access-context source tag the upstream API expects back
    pub source: String,
    /// Access token bound to the link the user pasted
    pub token: String,
}

/// Minimal reference to a user, embedded in posts and comments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User id
    pub id: String,
    /// Display name
    pub nickname: String,
}

/// Locale-formatted engagement counters carried by posts.
///
/// Values may be empty (treated as zero) or carry a magnitude suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    /// Like count
    #[serde(default)]
    pub likes: String,
    /// Collect/favourite count
    #[serde(default)]
    pub collects: String,
    /// Comment count
    #[serde(default)]
    pub comments: String,
    /// Share count
    #[serde(default)]
    pub shares: String,
}

/// A single image asset of a gallery post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Direct URL of the image
    pub url: String,
    /// Companion video URL when the image is a live photo
    #[serde(default)]
    pub live_video_url: Option<String>,
}

/// Media carried by a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PostMedia {
    /// A video post with one direct video URL
    Video {
        /// Direct URL of the video
        url: String,
    },
    /// An image post with one or more images
    Gallery {
        /// Image assets in display order
        images: Vec<ImageAsset>,
    },
}

/// Full detail record for one post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    /// Post id
    pub id: String,
    /// Post author
    pub author: UserRef,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body text
    #[serde(default)]
    pub body: String,
    /// Attached media
    pub media: PostMedia,
    /// Engagement counters
    #[serde(default)]
    pub engagement: Engagement,
    /// Publish time, milliseconds since the Unix epoch
    pub published_at: i64,
    /// Last update time, milliseconds since the Unix epoch
    #[serde(default)]
    pub updated_at: i64,
    /// Coarse location attached by the platform
    #[serde(default)]
    pub ip_location: String,
}

/// A top-level comment on a post.
///
/// Append-only within a job: once fetched it is never re-fetched or mutated
/// except to append newly-fetched replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: String,
    /// Id of the post this comment belongs to
    pub post_id: String,
    /// Comment author
    pub user: UserRef,
    /// Comment text
    #[serde(default)]
    pub content: String,
    /// URLs of pictures attached to the comment
    #[serde(default)]
    pub pictures: Vec<String>,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,
    /// Like count (locale string)
    #[serde(default)]
    pub like_count: String,
    /// Total reply count as reported by the platform (locale string)
    #[serde(default)]
    pub reply_count: String,
    /// Coarse location
    #[serde(default)]
    pub ip_location: String,
    /// Whether more replies exist beyond `replies`
    #[serde(default)]
    pub has_more_replies: bool,
    /// Opaque cursor for fetching further replies
    #[serde(default)]
    pub reply_cursor: String,
    /// Replies fetched so far (appended by the reply fetcher)
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// The comment a reply is answering, as a non-owning lookup key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    /// Id of the comment being answered
    pub comment_id: String,
    /// Author of the comment being answered
    pub user: UserRef,
}

/// A nested reply under a top-level comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Reply id
    pub id: String,
    /// Id of the post this reply belongs to
    pub post_id: String,
    /// Reply author
    pub user: UserRef,
    /// Reply text
    #[serde(default)]
    pub content: String,
    /// URLs of pictures attached to the reply
    #[serde(default)]
    pub pictures: Vec<String>,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: i64,
    /// Like count (locale string)
    #[serde(default)]
    pub like_count: String,
    /// Coarse location
    #[serde(default)]
    pub ip_location: String,
    /// The comment this reply quotes, when it answers another reply
    #[serde(default)]
    pub target: Option<ReplyTarget>,
}

/// Uniform borrowed view over the two comment shapes, used when building
/// export rows.
#[derive(Clone, Copy, Debug)]
pub enum CommentNode<'a> {
    /// A top-level comment
    Comment(&'a Comment),
    /// A nested reply
    Reply(&'a Reply),
}

impl<'a> CommentNode<'a> {
    /// Node id.
    pub fn id(&self) -> &'a str {
        match self {
            CommentNode::Comment(c) => &c.id,
            CommentNode::Reply(r) => &r.id,
        }
    }

    /// Author reference.
    pub fn user(&self) -> &'a UserRef {
        match self {
            CommentNode::Comment(c) => &c.user,
            CommentNode::Reply(r) => &r.user,
        }
    }
}

/// Lightweight post record returned by author-feed pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post id
    pub id: String,
    /// Access token for fetching the full detail
    #[serde(default)]
    pub token: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Publish time, milliseconds since the Unix epoch
    pub published_at: i64,
    /// Engagement counters
    #[serde(default)]
    pub engagement: Engagement,
}

/// Author gender as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Not disclosed
    #[default]
    Unknown,
}

impl Gender {
    /// Export label for the tabular artifact.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

/// Profile record for one author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Author id
    pub id: String,
    /// Display name
    pub nickname: String,
    /// Gender
    #[serde(default)]
    pub gender: Gender,
    /// Platform handle (the short id shown on the profile page)
    #[serde(default)]
    pub handle: String,
    /// Bio text
    #[serde(default)]
    pub bio: String,
    /// Follower count (locale string)
    #[serde(default)]
    pub follower_count: String,
    /// Combined likes-and-collects count (locale string)
    #[serde(default)]
    pub reaction_count: String,
    /// Following count (locale string)
    #[serde(default)]
    pub following_count: String,
    /// Coarse location
    #[serde(default)]
    pub ip_location: String,
    /// Recent-post sample attached by the engagement enrichment step
    #[serde(default)]
    pub recent_posts: Option<Vec<PostSummary>>,
}
