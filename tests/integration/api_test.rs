//! Boundary behavior: descriptor, health, validation, auth, not-found.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{png_data_url, TestApp};

#[tokio::test]
async fn descriptor_and_health_respond() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "renderhub");

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submit_rejects_missing_required_fields() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/jobs", &json!({"user":"u","layers":[]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PAYLOAD");

    let (status, _) = app
        .post_json("/jobs", &json!({"guild":"g","user":"u"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_rejects_oversize_canvas() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/jobs",
            &json!({
                "guild": "g",
                "user": "u",
                "size": {"width": 2048, "height": 300},
                "layers": []
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn submit_rejects_excess_layers_and_frames() {
    let app = TestApp::new();

    let layers: Vec<_> = (0..51)
        .map(|_| json!({"type": "floor", "key": "wood"}))
        .collect();
    let (status, _) = app
        .post_json("/jobs", &json!({"guild":"g","user":"u","layers":layers}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let frames: Vec<_> = (0..121).map(|_| json!({"url": "u"})).collect();
    let (status, _) = app
        .post_json(
            "/jobs",
            &json!({
                "guild": "g",
                "user": "u",
                "layers": [{"type": "pet_gif_frames", "frames": frames}]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_job_polls_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .get_json(&format!("/jobs/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.get_json("/jobs/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_token_guards_job_endpoints_only() {
    let app = TestApp::with_config(|config| {
        config.server.api_token = Some("sekrit".to_string());
    });

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 4, "height": 4},
        "layers": [{"type": "static", "url": png_data_url(2, 2, [1, 2, 3, 255])}]
    });

    let (status, body) = app.post_json("/jobs", &payload).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app.post_json_bearer("/jobs", &payload, "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.post_json_bearer("/jobs", &payload, "sekrit").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jobId"].is_string());

    // Liveness stays public.
    let (status, _) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_artifacts_are_not_found() {
    let app = TestApp::new();

    let (status, _, _) = app.get_raw("/out/0123456789abcdef.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Traversal-shaped names never touch the filesystem.
    let (status, _, _) = app.get_raw("/out/..%2Fsecrets.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
