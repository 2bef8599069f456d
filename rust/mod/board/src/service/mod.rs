pub mod schema;
pub mod counter;
pub mod post;
pub mod comment;
pub mod reaction;
pub mod user;

use std::sync::Arc;

use thiserror::Error;

use dearbaby_core::ServiceError;
use dearbaby_sql::{SQLError, SQLStore};

use crate::identity::IdentityProvider;

/// Board service error type.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for BoardError {
    fn from(e: SQLError) -> Self {
        BoardError::Storage(e.to_string())
    }
}

impl From<BoardError> for ServiceError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::NotFound(m) => ServiceError::NotFound(m),
            BoardError::Conflict(m) => ServiceError::Conflict(m),
            BoardError::Validation(m) => ServiceError::Validation(m),
            BoardError::Unauthorized(m) => ServiceError::Unauthorized(m),
            BoardError::Forbidden(m) => ServiceError::PermissionDenied(m),
            BoardError::Storage(m) => ServiceError::Storage(m),
            BoardError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Tunables for the board service.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Page size when a listing does not ask for one.
    pub default_page_size: u32,
    /// Upper bound on any requested page size.
    pub max_page_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// The board service: posts, comments, reactions and profiles over one store.
pub struct BoardService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) config: BoardConfig,
}

impl BoardService {
    /// Create a new BoardService, initializing the DB schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        identity: Arc<dyn IdentityProvider>,
        config: BoardConfig,
    ) -> Result<Arc<Self>, BoardError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self {
            sql,
            identity,
            config,
        }))
    }

    /// The identity provider bearer tokens are resolved against.
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}

/// Return the value when present and non-empty.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
