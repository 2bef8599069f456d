use tracing::debug;

use dearbaby_sql::Value;

use crate::service::{BoardError, BoardService};

/// A denormalized counter column on `posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Dislikes,
    Comments,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::Likes => "likes_count",
            Counter::Dislikes => "dislikes_count",
            Counter::Comments => "comments_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Increment,
    Decrement,
}

impl Adjust {
    fn verb(self) -> &'static str {
        match self {
            Adjust::Increment => "increment",
            Adjust::Decrement => "decrement",
        }
    }

    fn operator(self) -> &'static str {
        match self {
            Adjust::Increment => "+",
            Adjust::Decrement => "-",
        }
    }
}

impl BoardService {
    /// Run the `{increment,decrement}_{column}` procedure for one post.
    ///
    /// A single UPDATE, atomic on its own. No floor: decrementing a zero
    /// counter makes it negative. A missing post is a no-op.
    pub(crate) fn adjust_counter(
        &self,
        counter: Counter,
        adjust: Adjust,
        post_id: &str,
    ) -> Result<(), BoardError> {
        let column = counter.column();
        let sql = format!(
            "UPDATE posts SET {col} = {col} {op} 1 WHERE id = ?1",
            col = column,
            op = adjust.operator(),
        );

        let affected = self.sql.exec(&sql, &[Value::from(post_id)])?;
        debug!(
            procedure = %format!("{}_{}", adjust.verb(), column),
            post_id,
            affected,
            "counter procedure"
        );
        Ok(())
    }
}
