//! Server-side configuration.
//!
//! Loaded from a TOML file given with `-c`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Complete server configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub storage: StorageSection,
    pub identity: IdentitySection,
    #[serde(default)]
    pub posts: PostsSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Listen address, overridden by `--listen`.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// SQLite database file. The parent directory is created on start.
    pub sqlite_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySection {
    /// HS256 secret shared with the identity provider.
    pub jwt_secret: String,
    /// Required `aud` claim, when set.
    #[serde(default)]
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsSection {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "max_page_size")]
    pub max_page_size: u32,
}

impl Default for PostsSection {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn max_page_size() -> u32 {
    100
}

impl ServerConfig {
    /// Resolve `-c` to a file path.
    ///
    /// A bare name maps to `/etc/dearbaby/<name>.toml`; anything containing
    /// `/` or `.` is used as given.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/dearbaby/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Board tunables from the `[posts]` section.
    pub fn board(&self) -> board::service::BoardConfig {
        board::service::BoardConfig {
            default_page_size: self.posts.default_page_size,
            max_page_size: self.posts.max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[server]
listen = "127.0.0.1:9000"

[storage]
sqlite_path = "data/dearbaby.sqlite"

[identity]
jwt_secret = "s3cret"
audience = "authenticated"

[posts]
default_page_size = 20
max_page_size = 50
"#;

    #[test]
    fn parses_full_file() {
        let config = ServerConfig::parse(FULL).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert_eq!(config.storage.sqlite_path, "data/dearbaby.sqlite");
        assert_eq!(config.identity.audience.as_deref(), Some("authenticated"));
        assert_eq!(config.board().default_page_size, 20);
        assert_eq!(config.board().max_page_size, 50);
    }

    #[test]
    fn optional_sections_default() {
        let config = ServerConfig::parse(
            "[storage]\nsqlite_path = \"x.sqlite\"\n[identity]\njwt_secret = \"k\"\n",
        )
        .unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.identity.audience, None);
        assert_eq!(config.posts.default_page_size, 10);
        assert_eq!(config.posts.max_page_size, 100);
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(ServerConfig::parse("[storage]\nsqlite_path = \"x\"\n").is_err());
    }

    #[test]
    fn resolve_name_or_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/dearbaby/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, FULL).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap().identity.jwt_secret, "s3cret");
        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
