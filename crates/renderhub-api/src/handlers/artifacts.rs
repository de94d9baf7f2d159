//! Artifact serving with long-lived immutable caching headers.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;

use renderhub_core::error::AppError;
use renderhub_core::model::OutputFormat;

use crate::state::AppState;

/// GET /out/:name
///
/// Artifacts are content-addressed and immutable, so clients may cache
/// them for a year.
pub async fn serve_artifact(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let format = parse_artifact_name(&name)
        .ok_or_else(|| AppError::not_found(format!("Artifact not found: {name}")))?;

    let bytes = state.artifacts.read(&name).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CACHE_CONTROL,
            "public, max-age=31536000, immutable",
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// Accept only `<hex fingerprint>.<png|gif>` names.
fn parse_artifact_name(name: &str) -> Option<OutputFormat> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match ext {
        "png" => Some(OutputFormat::Png),
        "gif" => Some(OutputFormat::Gif),
        _ => None,
    }
}
