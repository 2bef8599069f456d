use std::collections::HashSet;

use tracing::info;

use dearbaby_core::{new_id, now_rfc3339};
use dearbaby_sql::{Row, Value};

use crate::identity::Identity;
use crate::model::{
    AuthorRef, CreatePost, Post, PostDetail, PostFilter, PostView, ReactionKind, UpdatePost,
    ViewerReaction,
};
use crate::service::{BoardError, BoardService, required};

const POST_SELECT: &str = "SELECT p.id, p.title, p.content, p.author_id, p.likes_count,
        p.dislikes_count, p.comments_count, p.created_at, p.updated_at, u.name AS author_name
    FROM posts p LEFT JOIN users u ON u.id = p.author_id";

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn post_view(row: &Row, viewer: Option<ViewerReaction>) -> Result<PostView, BoardError> {
    Ok(PostView {
        post: Post::from_row(row)?,
        author: AuthorRef::from_joined(row),
        viewer,
    })
}

impl BoardService {
    /// List posts newest first, one page at a time.
    ///
    /// With a viewer, each post also reports whether that user liked or
    /// disliked it (one extra query per reaction table).
    pub fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostView>, BoardError> {
        let mut sql = POST_SELECT.to_string();
        let mut params = Vec::new();

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            sql.push_str(
                " WHERE fold(p.title) LIKE fold(?1) ESCAPE '\\' OR fold(p.content) LIKE fold(?1) ESCAPE '\\'",
            );
            params.push(Value::from(like_pattern(term)));
        }

        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;
        params.push(Value::Integer(i64::from(filter.page.limit)));
        params.push(Value::Integer(filter.page.offset() as i64));
        sql.push_str(&format!(
            " ORDER BY p.created_at DESC, p.rowid DESC LIMIT ?{} OFFSET ?{}",
            limit_idx, offset_idx,
        ));

        let rows = self.sql.query(&sql, &params)?;

        let viewer = match filter.viewer.as_deref().filter(|v| !v.is_empty()) {
            Some(user_id) => {
                let ids = rows
                    .iter()
                    .map(|r| r.text("id"))
                    .collect::<Result<Vec<_>, _>>()?;
                Some((
                    self.reacted_post_ids(ReactionKind::Like, user_id, &ids)?,
                    self.reacted_post_ids(ReactionKind::Dislike, user_id, &ids)?,
                ))
            }
            None => None,
        };

        rows.iter()
            .map(|row| {
                let reaction = viewer.as_ref().map(|(liked, disliked)| {
                    let id = row.get_str("id").unwrap_or_default();
                    ViewerReaction {
                        user_liked: liked.contains(id),
                        user_disliked: disliked.contains(id),
                    }
                });
                post_view(row, reaction)
            })
            .collect()
    }

    /// Ids among `post_ids` the user has a reaction of `kind` on.
    fn reacted_post_ids(
        &self,
        kind: ReactionKind,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, BoardError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let placeholders: Vec<String> = (0..post_ids.len()).map(|i| format!("?{}", i + 2)).collect();
        let sql = format!(
            "SELECT post_id FROM {} WHERE user_id = ?1 AND post_id IN ({})",
            kind.table(),
            placeholders.join(", "),
        );

        let mut params = Vec::with_capacity(post_ids.len() + 1);
        params.push(Value::from(user_id));
        params.extend(post_ids.iter().map(|id| Value::from(id.as_str())));

        self.sql
            .query(&sql, &params)?
            .iter()
            .map(|r| r.text("post_id").map_err(BoardError::from))
            .collect()
    }

    /// Fetch one post with its author and full comment thread.
    pub fn get_post(&self, id: &str) -> Result<PostDetail, BoardError> {
        let view = self.get_post_view(id)?;
        let comments = self.list_comments(id)?;
        Ok(PostDetail {
            post: view.post,
            author: view.author,
            comments,
        })
    }

    fn get_post_view(&self, id: &str) -> Result<PostView, BoardError> {
        let sql = format!("{} WHERE p.id = ?1", POST_SELECT);
        let row = self
            .sql
            .query_opt(&sql, &[Value::from(id)])?
            .ok_or_else(|| BoardError::NotFound("Post not found".into()))?;
        post_view(&row, None)
    }

    /// Create a post with all counters at zero.
    pub fn create_post(&self, input: CreatePost) -> Result<PostView, BoardError> {
        let (Some(title), Some(content), Some(author_id)) = (
            required(input.title),
            required(input.content),
            required(input.author_id),
        ) else {
            return Err(BoardError::Validation("Missing required fields".into()));
        };

        let id = new_id();
        let now = now_rfc3339();
        self.sql.exec(
            "INSERT INTO posts (id, title, content, author_id, likes_count, dislikes_count,
                                comments_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?5)",
            &[
                Value::from(id.as_str()),
                Value::from(title),
                Value::from(content),
                Value::from(author_id.as_str()),
                Value::from(now),
            ],
        )?;

        info!(post_id = %id, %author_id, "post created");
        self.get_post_view(&id)
    }

    /// Edit title and content. Only the post's author may do this.
    pub fn update_post(
        &self,
        caller: &Identity,
        id: &str,
        input: UpdatePost,
    ) -> Result<PostView, BoardError> {
        let (Some(title), Some(content)) = (required(input.title), required(input.content)) else {
            return Err(BoardError::Validation("Missing required fields".into()));
        };

        let author_id = self
            .sql
            .query_opt("SELECT author_id FROM posts WHERE id = ?1", &[Value::from(id)])?
            .ok_or_else(|| BoardError::NotFound("Post not found".into()))?
            .text("author_id")?;

        if author_id != caller.id {
            return Err(BoardError::Forbidden("Forbidden".into()));
        }

        self.sql.exec(
            "UPDATE posts SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            &[
                Value::from(title),
                Value::from(content),
                Value::from(now_rfc3339()),
                Value::from(id),
            ],
        )?;

        info!(post_id = id, "post updated");
        self.get_post_view(id)
    }

    /// Delete a post and, by cascade, its comments and reactions.
    ///
    /// No ownership check is made here.
    pub fn delete_post(&self, id: &str) -> Result<(), BoardError> {
        let affected = self.sql.exec("DELETE FROM posts WHERE id = ?1", &[Value::from(id)])?;
        info!(post_id = id, affected, "post deleted");
        Ok(())
    }

    /// Total number of posts.
    pub fn count_posts(&self) -> Result<u64, BoardError> {
        self.count_rows("posts")
    }

    pub(crate) fn count_rows(&self, table: &str) -> Result<u64, BoardError> {
        let sql = format!("SELECT COUNT(*) AS cnt FROM {}", table);
        let count = self
            .sql
            .query_opt(&sql, &[])?
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0);
        Ok(count as u64)
    }
}
