//! Listshare server entry point

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use listshare::api;
use listshare::auth::HttpIdentityProvider;
use listshare::config::Config;
use listshare::repository::init_db;
use listshare::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.service_role_key.is_none() {
        warn!("IDENTITY_SERVICE_ROLE_KEY is not set; invites will fail until it is configured");
    }

    let db = init_db(&config.db_path).context("database init failed")?;
    let provider = Arc::new(HttpIdentityProvider::new(
        config.provider_url.clone(),
        config.anon_key.clone(),
        config.service_role_key.clone(),
        config.provider_timeout,
        config.lookup_page_size,
    )?);

    let state = Arc::new(AppState::new(db, provider));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
