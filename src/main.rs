//! Master League: betting administration server
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the book from its snapshot (or starts empty), and serves the
//! REST API until Ctrl+C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use masterleague::api::{self, routes::ApiState};
use masterleague::book::Sportsbook;
use masterleague::config::AppConfig;
use masterleague::storage::JsonFileStore;

const CONFIG_PATH_ENV: &str = "MASTERLEAGUE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let cfg = AppConfig::load(&config_path)?;

    let limits = cfg.betting.stake_limits();
    info!(
        port = cfg.server.port,
        min_stake = %limits.min,
        max_stake = %limits.max,
        snapshot = ?cfg.storage.snapshot_path,
        "Master League starting up"
    );

    let book = match &cfg.storage.snapshot_path {
        Some(path) => Sportsbook::with_store(limits, Arc::new(JsonFileStore::new(path)))?,
        None => Sportsbook::new(limits),
    };

    let state = Arc::new(ApiState::new(book, cfg.admin_password()));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", cfg.server.host, cfg.server.port))?;

    api::serve(state, addr, &cfg.server.cors_allow_origin, shutdown_signal()).await?;

    info!("Master League shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("masterleague=info,tower_http=info"));

    let json_logging = std::env::var("MASTERLEAGUE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
