//! `dearbabyd`, the Dear Baby board server.
//!
//! Usage:
//!   dearbabyd -c <name-or-path> [--listen <addr>]
//!   dearbabyd -c <name-or-path> token --user <id> [--email <addr>] [--ttl <secs>]
//!
//! A bare name resolves to `/etc/dearbaby/<name>.toml`.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use dearbaby_core::Module;
use tracing::info;

use config::ServerConfig;

/// Dear Baby board server.
#[derive(Parser, Debug)]
#[command(name = "dearbabyd", about = "Dear Baby board server")]
struct Cli {
    /// Config name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides `[server] listen`).
    #[arg(long = "listen")]
    listen: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint a development access token signed with the configured secret.
    Token {
        /// User id (token subject).
        #[arg(long)]
        user: String,
        /// Email claim.
        #[arg(long)]
        email: Option<String>,
        /// Lifetime in seconds.
        #[arg(long, default_value_t = 86400)]
        ttl: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let identity = Arc::new(board::JwtIdentity::new(
        &server_config.identity.jwt_secret,
        server_config.identity.audience.clone(),
    ));

    if let Some(Commands::Token { user, email, ttl }) = cli.command {
        let token = identity
            .issue(&user, email.as_deref(), ttl)
            .map_err(|e| anyhow::anyhow!("failed to issue token: {}", e))?;
        println!("{}", token);
        return Ok(());
    }

    let sql = bootstrap::open_store(&server_config.storage.sqlite_path)?;
    let board_module = board::BoardModule::new(sql, identity, server_config.board())?;
    info!("Board module initialized");

    let app = routes::build_router(vec![(board_module.name(), board_module.routes())]);

    let listen = cli.listen.unwrap_or(server_config.server.listen);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Dear Baby server listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
