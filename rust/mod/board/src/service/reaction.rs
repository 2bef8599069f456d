//! Like / dislike toggling.
//!
//! Each operation is a short sequence of independent store calls with no
//! enclosing transaction. A failure part-way leaves the counters out of
//! step with the reaction rows; nothing here repairs that.

use tracing::{info, warn};

use dearbaby_core::{new_id, now_rfc3339};
use dearbaby_sql::Value;

use crate::model::{Reaction, ReactionKind};
use crate::service::counter::{Adjust, Counter};
use crate::service::{BoardError, BoardService, required};

impl ReactionKind {
    fn counter(self) -> Counter {
        match self {
            ReactionKind::Like => Counter::Likes,
            ReactionKind::Dislike => Counter::Dislikes,
        }
    }
}

impl BoardService {
    /// Like or dislike a post on behalf of `user_id`.
    ///
    /// Fails with Conflict when the same reaction already exists. Otherwise
    /// removes the opposite reaction, inserts the new row, bumps the
    /// matching counter and, only when an opposite row was actually
    /// removed, decrements the opposite counter.
    pub fn set_reaction(
        &self,
        post_id: &str,
        user_id: Option<String>,
        kind: ReactionKind,
    ) -> Result<Reaction, BoardError> {
        let user_id = required(user_id)
            .ok_or_else(|| BoardError::Validation("User ID is required".into()))?;

        if self.has_reaction(kind, post_id, &user_id)? {
            return Err(BoardError::Conflict(kind.duplicate_message().into()));
        }

        let opposite = kind.opposite();
        let removed = self.delete_reaction_row(opposite, post_id, &user_id)?;

        let reaction = Reaction {
            id: new_id(),
            post_id: post_id.to_string(),
            user_id,
            created_at: now_rfc3339(),
        };
        let sql = format!(
            "INSERT INTO {} (id, post_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            kind.table()
        );
        self.sql
            .exec(
                &sql,
                &[
                    Value::from(reaction.id.as_str()),
                    Value::from(reaction.post_id.as_str()),
                    Value::from(reaction.user_id.as_str()),
                    Value::from(reaction.created_at.as_str()),
                ],
            )
            .map_err(|e| {
                if e.is_unique_violation() {
                    BoardError::Conflict(kind.duplicate_message().into())
                } else {
                    BoardError::from(e)
                }
            })?;

        self.adjust_counter(kind.counter(), Adjust::Increment, post_id)
            .inspect_err(|e| warn!(post_id, error = %e, "reaction row stored but counter not incremented"))?;
        if removed {
            self.adjust_counter(opposite.counter(), Adjust::Decrement, post_id)
                .inspect_err(|e| warn!(post_id, error = %e, "opposite reaction removed but counter not decremented"))?;
        }

        info!(
            post_id,
            user_id = %reaction.user_id,
            reaction = kind.envelope_key(),
            replaced = removed,
            "reaction set"
        );
        Ok(reaction)
    }

    /// Remove a like or dislike and decrement its counter.
    ///
    /// The row is not looked up first: the counter is decremented even
    /// when there was nothing to delete.
    pub fn clear_reaction(
        &self,
        post_id: &str,
        user_id: Option<String>,
        kind: ReactionKind,
    ) -> Result<(), BoardError> {
        let user_id = required(user_id)
            .ok_or_else(|| BoardError::Validation("User ID is required".into()))?;

        let removed = self.delete_reaction_row(kind, post_id, &user_id)?;
        self.adjust_counter(kind.counter(), Adjust::Decrement, post_id)?;

        info!(post_id, %user_id, reaction = kind.envelope_key(), removed, "reaction cleared");
        Ok(())
    }

    fn has_reaction(&self, kind: ReactionKind, post_id: &str, user_id: &str) -> Result<bool, BoardError> {
        let sql = format!(
            "SELECT id FROM {} WHERE post_id = ?1 AND user_id = ?2",
            kind.table()
        );
        let row = self
            .sql
            .query_opt(&sql, &[Value::from(post_id), Value::from(user_id)])?;
        Ok(row.is_some())
    }

    /// Delete the pair's row of `kind`; true when a row was removed.
    fn delete_reaction_row(&self, kind: ReactionKind, post_id: &str, user_id: &str) -> Result<bool, BoardError> {
        let sql = format!(
            "DELETE FROM {} WHERE post_id = ?1 AND user_id = ?2",
            kind.table()
        );
        let affected = self
            .sql
            .exec(&sql, &[Value::from(post_id), Value::from(user_id)])?;
        Ok(affected > 0)
    }
}
