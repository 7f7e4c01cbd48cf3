//! Shelfbot — chat-driven inventory server.
//!
//! One endpoint takes a chat message (free text or slash command) and
//! replies; the rest are read-only projections of the catalog and the
//! movement log.

mod commands;
mod config;
mod dispatch;
mod enrich;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;
use crate::state::AppState;
use sb_inventory::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sb-bot starting");

    let config = BotConfig::from_env();
    let enricher = enrich::from_config(&config.ai);

    // Connect to PostgreSQL if DATABASE_URL is set, otherwise run in-memory.
    let state = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let store = PgStore::connect(database_url).await?;
        AppState::new(Arc::new(store), enricher)
    } else {
        tracing::warn!("DATABASE_URL not set — using in-memory store with sample data");
        AppState::new(state::sample_store(), enricher)
    };

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
