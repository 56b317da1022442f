//! HTTP server assembly: shared state, router and serve loop

pub mod router;

pub use router::build_router;

use crate::core::auth::JwtVerifier;
use crate::core::service::AgencyStore;
use anyhow::Result;
use axum::extract::FromRef;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application state shared across handlers
///
/// Built once at startup and injected via axum's `State`; there is no
/// import-time global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AgencyStore>,
    pub verifier: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn AgencyStore>, verifier: Arc<JwtVerifier>) -> Self {
        Self { store, verifier }
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

/// Serve the application with graceful shutdown
///
/// Binds the address, serves requests, and drains on SIGTERM or Ctrl+C.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
