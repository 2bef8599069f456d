use tracing::{info, warn};

use dearbaby_core::{new_id, now_rfc3339};
use dearbaby_sql::Value;

use crate::model::{AuthorRef, Comment, CommentView, CreateComment};
use crate::service::counter::{Adjust, Counter};
use crate::service::{BoardError, BoardService, required};

const COMMENT_SELECT: &str = "SELECT c.id, c.content, c.post_id, c.author_id, c.created_at,
        c.updated_at, u.name AS author_name
    FROM comments c LEFT JOIN users u ON u.id = c.author_id";

impl BoardService {
    /// All comments on a post, oldest first.
    pub fn list_comments(&self, post_id: &str) -> Result<Vec<CommentView>, BoardError> {
        let sql = format!(
            "{} WHERE c.post_id = ?1 ORDER BY c.created_at ASC, c.rowid ASC",
            COMMENT_SELECT
        );
        self.sql
            .query(&sql, &[Value::from(post_id)])?
            .iter()
            .map(|row| -> Result<CommentView, BoardError> {
                Ok(CommentView {
                    comment: Comment::from_row(row)?,
                    author: AuthorRef::from_joined(row),
                })
            })
            .collect()
    }

    /// Append a comment, then bump the post's comment counter.
    pub fn create_comment(&self, post_id: &str, input: CreateComment) -> Result<CommentView, BoardError> {
        let (Some(content), Some(author_id)) = (required(input.content), required(input.author_id)) else {
            return Err(BoardError::Validation("Missing required fields".into()));
        };

        let id = new_id();
        let now = now_rfc3339();
        self.sql.exec(
            "INSERT INTO comments (id, content, post_id, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            &[
                Value::from(id.as_str()),
                Value::from(content),
                Value::from(post_id),
                Value::from(author_id.as_str()),
                Value::from(now),
            ],
        )?;

        self.adjust_counter(Counter::Comments, Adjust::Increment, post_id)
            .inspect_err(|e| warn!(post_id, comment_id = %id, error = %e, "comment stored but counter not incremented"))?;

        info!(post_id, comment_id = %id, %author_id, "comment created");
        self.get_comment_view(&id)
    }

    fn get_comment_view(&self, id: &str) -> Result<CommentView, BoardError> {
        let sql = format!("{} WHERE c.id = ?1", COMMENT_SELECT);
        let row = self
            .sql
            .query_opt(&sql, &[Value::from(id)])?
            .ok_or_else(|| BoardError::NotFound("Comment not found".into()))?;
        Ok(CommentView {
            comment: Comment::from_row(&row)?,
            author: AuthorRef::from_joined(&row),
        })
    }

    /// Delete a comment and decrement its post's comment counter.
    ///
    /// Anyone holding the comment id may delete it.
    pub fn delete_comment(&self, id: &str) -> Result<(), BoardError> {
        let post_id = self
            .sql
            .query_opt("SELECT post_id FROM comments WHERE id = ?1", &[Value::from(id)])?
            .ok_or_else(|| BoardError::NotFound("Comment not found".into()))?
            .text("post_id")?;

        self.sql.exec("DELETE FROM comments WHERE id = ?1", &[Value::from(id)])?;
        self.adjust_counter(Counter::Comments, Adjust::Decrement, &post_id)
            .inspect_err(|e| warn!(%post_id, comment_id = id, error = %e, "comment deleted but counter not decremented"))?;

        info!(%post_id, comment_id = id, "comment deleted");
        Ok(())
    }
}
