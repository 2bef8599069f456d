use serde::{Deserialize, Serialize};

/// Which of the two mutually exclusive reactions a row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Table holding rows of this kind.
    pub fn table(self) -> &'static str {
        match self {
            ReactionKind::Like => "likes",
            ReactionKind::Dislike => "dislikes",
        }
    }

    /// The reaction this one excludes.
    pub fn opposite(self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }

    /// Key of the JSON envelope wrapping a created row.
    pub fn envelope_key(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }

    pub(crate) fn duplicate_message(self) -> &'static str {
        match self {
            ReactionKind::Like => "Post already liked",
            ReactionKind::Dislike => "Post already disliked",
        }
    }
}

/// A Like or Dislike row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: String,
}

/// Body of the like / dislike routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionInput {
    #[serde(default)]
    pub user_id: Option<String>,
}
