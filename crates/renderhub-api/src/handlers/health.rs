//! Service descriptor and liveness handlers.

use axum::Json;

use crate::dto::response::{HealthResponse, ServiceDescriptor};

/// GET /
pub async fn descriptor() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: "renderhub".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
