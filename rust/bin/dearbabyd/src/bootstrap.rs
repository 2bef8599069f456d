//! Startup checks and store initialization.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;

/// Refuse to start on a configuration that cannot serve requests.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.identity.jwt_secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.sqlite_path.is_empty() {
        anyhow::bail!("Storage sqlite_path is empty in configuration.");
    }
    if config.posts.max_page_size == 0 {
        anyhow::bail!("posts.max_page_size must be at least 1.");
    }
    if config.posts.default_page_size == 0 || config.posts.default_page_size > config.posts.max_page_size {
        anyhow::bail!(
            "posts.default_page_size must be between 1 and max_page_size ({}).",
            config.posts.max_page_size
        );
    }
    Ok(())
}

/// Open the SQLite store, creating its parent directory if needed.
pub fn open_store(sqlite_path: &str) -> anyhow::Result<Arc<dyn dearbaby_sql::SQLStore>> {
    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = dearbaby_sql::SqliteStore::open(path)
        .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?;
    info!("SQL store opened at {}", path.display());
    Ok(Arc::new(store))
}
