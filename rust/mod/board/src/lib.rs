//! Board module: a small social feed of posts, comments and reactions.
//!
//! # Resources
//!
//! - **User**: profile row keyed by the identity provider's user id
//! - **Post**: text entry with denormalized like/dislike/comment counters
//! - **Comment**: reply attached to a post
//! - **Like / Dislike**: at most one of each per (post, user), mutually exclusive
//!
//! # Usage
//!
//! ```ignore
//! use board::{BoardModule, service::BoardConfig};
//!
//! let module = BoardModule::new(sql, identity, BoardConfig::default())?;
//! let router = module.routes(); // Mount under /api
//! ```

pub mod model;
pub mod service;
pub mod api;
pub mod identity;

use std::sync::Arc;

use axum::Router;

use dearbaby_core::{Module, ServiceError};
use dearbaby_sql::SQLStore;

use crate::identity::IdentityProvider;
use crate::service::{BoardConfig, BoardService};

pub use identity::{Identity, JwtIdentity};

/// Board module implementing the Module trait.
pub struct BoardModule {
    service: Arc<BoardService>,
}

impl BoardModule {
    /// Create the module, initializing the schema in `sql`.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        identity: Arc<dyn IdentityProvider>,
        config: BoardConfig,
    ) -> Result<Self, ServiceError> {
        let service = BoardService::new(sql, identity, config).map_err(ServiceError::from)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<BoardService> {
        &self.service
    }
}

impl Module for BoardModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
