//! Binary entry point: load config, build the store, serve

use anyhow::Result;
use baseball_agency::config::AppConfig;
use baseball_agency::core::auth::JwtVerifier;
use baseball_agency::core::service::AgencyStore;
use baseball_agency::server::{self, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    let store = build_store(&config).await?;
    let verifier = Arc::new(JwtVerifier::new(&config.jwt));

    let state = AppState::new(store, verifier);
    server::serve(state, &config.bind_addr).await
}

#[cfg(feature = "postgres")]
async fn build_store(config: &AppConfig) -> Result<Arc<dyn AgencyStore>> {
    use anyhow::Context;
    use baseball_agency::storage::PostgresStore;

    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres backend")?;
    let store = PostgresStore::connect(url).await?;
    store.run_migrations().await?;

    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_store(_config: &AppConfig) -> Result<Arc<dyn AgencyStore>> {
    use baseball_agency::storage::InMemoryStore;

    tracing::warn!("using the in-memory store; data does not survive restarts");
    Ok(Arc::new(InMemoryStore::new()))
}
