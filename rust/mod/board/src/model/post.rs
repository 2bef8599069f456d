use serde::{Deserialize, Serialize};

use dearbaby_core::Page;
use dearbaby_sql::{Row, SQLError};

use super::{AuthorRef, CommentView};

/// A short text entry with denormalized reaction and comment counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub comments_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    pub(crate) fn from_row(row: &Row) -> Result<Self, SQLError> {
        Ok(Self {
            id: row.text("id")?,
            title: row.text("title")?,
            content: row.text("content")?,
            author_id: row.text("author_id")?,
            likes_count: row.integer("likes_count")?,
            dislikes_count: row.integer("dislikes_count")?,
            comments_count: row.integer("comments_count")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

/// Input for `POST /posts`. Every field is required and non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// Input for `PUT /posts/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Listing parameters after query-string parsing.
#[derive(Debug, Clone)]
pub struct PostFilter {
    pub page: Page,
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// When set, each listed post reports this user's reaction.
    pub viewer: Option<String>,
}

/// The viewer's reaction to a listed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewerReaction {
    pub user_liked: bool,
    pub user_disliked: bool,
}

/// A post as returned by list, create and update.
///
/// `user_liked` / `user_disliked` are serialized only when the listing
/// was requested on behalf of a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorRef>,
    #[serde(flatten)]
    pub viewer: Option<ViewerReaction>,
}

/// A single post with its full comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorRef>,
    pub comments: Vec<CommentView>,
}
