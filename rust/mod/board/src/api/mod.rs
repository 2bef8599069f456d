mod extract;
mod posts;
mod comments;
mod reactions;
mod users;


use std::sync::Arc;

use axum::Router;
use tracing::error;

use dearbaby_core::ServiceError;

use crate::service::{BoardError, BoardService};

pub use extract::{Caller, Payload};

/// Shared application state.
pub type AppState = Arc<BoardService>;

/// Build the board API router.
///
/// All routes are relative; the caller nests them under its own prefix.
pub fn build_router(svc: Arc<BoardService>) -> Router {
    Router::new()
        .merge(posts::routes())
        .merge(comments::routes())
        .merge(reactions::routes())
        .merge(users::routes())
        .with_state(svc)
}

/// Hide store failures behind a per-route message.
///
/// Client-facing errors (validation, auth, not found, conflict) pass
/// through unchanged; storage and internal errors are logged and replaced.
pub(crate) trait OrFail<T> {
    fn or_fail(self, message: &str) -> Result<T, ServiceError>;

    /// Like [`OrFail::or_fail`], appending the underlying message.
    fn or_fail_detailed(self, message: &str) -> Result<T, ServiceError>;
}

impl<T> OrFail<T> for Result<T, BoardError> {
    fn or_fail(self, message: &str) -> Result<T, ServiceError> {
        self.map_err(|e| match e {
            BoardError::Storage(m) | BoardError::Internal(m) => {
                error!(error = %m, "{}", message);
                ServiceError::Storage(message.to_string())
            }
            other => other.into(),
        })
    }

    fn or_fail_detailed(self, message: &str) -> Result<T, ServiceError> {
        self.map_err(|e| match e {
            BoardError::Storage(m) | BoardError::Internal(m) => {
                error!(error = %m, "{}", message);
                ServiceError::Storage(format!("{}: {}", message, m))
            }
            other => other.into(),
        })
    }
}
