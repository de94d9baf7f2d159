//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body returned by `POST /jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    /// Identifier to poll with.
    pub job_id: Uuid,
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness indicator.
    pub status: String,
    /// Crate version.
    pub version: String,
}
