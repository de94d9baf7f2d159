//! Application builder — wires state + router into a running server.

use renderhub_core::config::AppConfig;
use renderhub_core::error::AppError;
use renderhub_core::result::AppResult;

use crate::router::build_router;
use crate::state::build_state;

/// Build the dependency graph and serve until shutdown.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let state = build_state(config)?;
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(
        addr = %addr,
        public_base_url = %state.config.server.public_base_url,
        "RenderHub listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
