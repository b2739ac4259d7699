mod api;
mod config;
mod db;
mod entity;
mod repository;

use std::sync::Arc;

use anyhow::Context;
use arena_engine::{ContestEngine, ContestStore, MemoryContestStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{AppState, create_router};
use crate::config::AppConfig;
use crate::repository::SeaOrmContestStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting arena server");
    let config = AppConfig::load().context("failed to load arena config")?;

    let store: Arc<dyn ContestStore> = match db::init_pool_and_migrate()
        .await
        .context("failed to initialize database")?
    {
        Some(db) => {
            info!("using database-backed contest store");
            Arc::new(SeaOrmContestStore::new(db))
        }
        None => {
            warn!("DATABASE_URL is not set, contest data will live in memory only");
            Arc::new(MemoryContestStore::new())
        }
    };

    let engine = ContestEngine::from_config(&config.engine, store)
        .await
        .context("failed to initialize contest engine")?;
    let router = create_router(Arc::new(AppState::new(Arc::new(engine))));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(bind_addr = %config.server.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
