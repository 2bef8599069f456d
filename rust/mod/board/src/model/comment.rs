use serde::{Deserialize, Serialize};

use dearbaby_sql::{Row, SQLError};

use super::AuthorRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Comment {
    pub(crate) fn from_row(row: &Row) -> Result<Self, SQLError> {
        Ok(Self {
            id: row.text("id")?,
            content: row.text("content")?,
            post_id: row.text("post_id")?,
            author_id: row.text("author_id")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

/// Input for `POST /posts/{id}/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateComment {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// A comment with its joined author.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<AuthorRef>,
}
