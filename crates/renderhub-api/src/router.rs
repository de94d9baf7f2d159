//! Route definitions for the RenderHub HTTP API.

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
///
/// The bearer-token check covers only the two job endpoints; artifacts
/// and liveness stay public.
pub fn build_router(state: AppState) -> Router {
    let job_routes = Router::new()
        .route("/jobs", post(handlers::jobs::submit_job))
        .route("/jobs/:id", get(handlers::jobs::poll_job))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer,
        ));

    Router::new()
        .merge(job_routes)
        .route("/", get(handlers::health::descriptor))
        .route("/health", get(handlers::health::health))
        .route("/out/:name", get(handlers::artifacts::serve_artifact))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
