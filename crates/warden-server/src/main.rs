//! Warden server — application entry point.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use warden_auth::Authorizer;
use warden_store::Backend;
use warden_store::repository::{KvOtpRepository, KvSessionLedgerRepository, MemoryUserDirectory};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warden=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting warden server...");

    let config = ServerConfig::from_env()?;
    let backend = Backend::connect(&config.store)
        .await
        .context("connecting to key-value store")?;

    let authorizer = Authorizer::new(
        KvSessionLedgerRepository::new(backend.clone()),
        KvOtpRepository::new(backend),
        MemoryUserDirectory::new(),
        config.auth,
    )?;

    tracing::info!(
        max_sessions = authorizer.config().max_sessions,
        redis = config.store.url.is_some(),
        "authorizer ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    tracing::info!("Warden server stopped.");
    Ok(())
}
