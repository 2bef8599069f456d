use serde::{Deserialize, Serialize};

use dearbaby_sql::{Row, SQLError};

/// A community member. The id is the identity provider's subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Unique across users.
    pub email: String,

    /// Display name shown next to posts and comments.
    pub name: String,

    /// Profile image URL or data URI.
    pub profile_image: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

impl User {
    pub(crate) fn from_row(row: &Row) -> Result<Self, SQLError> {
        Ok(Self {
            id: row.text("id")?,
            email: row.text("email")?,
            name: row.text("name")?,
            profile_image: row.get_str("profile_image").map(str::to_string),
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }
}

/// Input for creating the profile row of an authenticated identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProfile {
    #[serde(default)]
    pub name: Option<String>,
    /// Used only when the token carries no email claim.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Input for `PUT /users/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Author fields joined onto posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRef {
    pub name: String,
}

impl AuthorRef {
    /// Read the joined `author_name` column; `None` when the author row is gone.
    pub(crate) fn from_joined(row: &Row) -> Option<Self> {
        row.get_str("author_name").map(|name| Self {
            name: name.to_string(),
        })
    }
}
