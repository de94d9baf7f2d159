//! Job submission and polling handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use renderhub_core::error::AppError;
use renderhub_core::model::{JobPayload, JobRecord};

use crate::dto::response::SubmitJobResponse;
use crate::state::AppState;

/// POST /jobs
pub async fn submit_job(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SubmitJobResponse>, AppError> {
    let payload: JobPayload = serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Malformed job payload: {e}")))?;

    let job_id = state.planner.submit(payload)?;
    Ok(Json(SubmitJobResponse { job_id }))
}

/// GET /jobs/:id
pub async fn poll_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, AppError> {
    let id: Uuid = id
        .parse()
        .map_err(|_| AppError::not_found(format!("Unknown job: {id}")))?;

    state.planner.poll(id).map(Json)
}
