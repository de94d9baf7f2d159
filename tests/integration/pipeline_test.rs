//! Render pipeline scenarios: static PNG, animated GIF, degradation,
//! partial failure, dedup, and artifact serving.

use std::io::Cursor;

use http::StatusCode;
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use serde_json::json;

use crate::helpers::{artifact_path, png_data_url, TestApp};

#[tokio::test]
async fn static_composition_produces_a_png_artifact() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 8, "height": 8},
        "layers": [
            {"type": "static", "url": png_data_url(8, 8, [255, 0, 0, 255])},
            {"type": "static", "url": png_data_url(4, 4, [0, 0, 255, 255]),
             "rect": {"x": 0, "y": 0, "w": 4, "h": 4}}
        ]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");
    assert_eq!(record["format"], "png");
    assert!(record["url"].as_str().unwrap().ends_with(".png"));

    let (status, headers, bytes) = app.get_raw(&artifact_path(&record)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(
        headers["cache-control"],
        "public, max-age=31536000, immutable"
    );

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (8, 8));
    // Declaration order: the blue quarter sits on top of the red base.
    assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 255, 255]);
    assert_eq!(decoded.get_pixel(6, 6).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn resubmission_reuses_the_artifact_url() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g1",
        "user": "u1",
        "size": {"width": 4, "height": 4},
        "layers": [{"type": "static", "url": png_data_url(4, 4, [10, 20, 30, 255])}]
    });
    let first = app.render(&payload).await;

    // Same pixels from a different caller: the fingerprint matches.
    let mut resubmitted = payload.clone();
    resubmitted["guild"] = json!("other-guild");
    resubmitted["user"] = json!("other-user");
    let second = app.render(&resubmitted).await;

    assert_eq!(first["url"], second["url"]);
}

#[tokio::test]
async fn animated_layer_triggers_a_looping_gif() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 6, "height": 6},
        "layers": [
            {"type": "static", "url": png_data_url(6, 6, [40, 40, 40, 255])},
            {"type": "pet_gif_frames", "frames": [
                {"url": png_data_url(6, 6, [255, 0, 0, 255])},
                {"url": png_data_url(6, 6, [0, 255, 0, 255])}
            ]}
        ]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");
    assert_eq!(record["format"], "gif");

    let (status, headers, bytes) = app.get_raw(&artifact_path(&record)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/gif");

    let decoder = GifDecoder::new(Cursor::new(&bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].delay().numer_denom_ms().0, 180);

    // Infinite loop marker.
    assert!(bytes
        .windows(b"NETSCAPE2.0".len())
        .any(|w| w == b"NETSCAPE2.0"));
}

#[tokio::test]
async fn gif_request_without_surviving_animation_degrades_to_png() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "format": "gif",
        "size": {"width": 4, "height": 4},
        "layers": [{"type": "static", "url": png_data_url(4, 4, [5, 6, 7, 255])}]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");
    assert_eq!(record["format"], "png");
    assert!(record["url"].as_str().unwrap().ends_with(".png"));
}

#[tokio::test]
async fn partial_asset_failure_omits_only_that_layer() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 4, "height": 4},
        "layers": [
            {"type": "static", "url": png_data_url(4, 4, [0, 128, 0, 255])},
            {"type": "static", "url": "data:image/png;base64,@@@not-base64@@@"},
            {"type": "static", "url": png_data_url(2, 2, [255, 255, 0, 255]),
             "rect": {"x": 2, "y": 2, "w": 2, "h": 2}}
        ]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");
    assert!(record.get("error").is_none());

    let (_, _, bytes) = app.get_raw(&artifact_path(&record)).await;
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 128, 0, 255]);
    assert_eq!(decoded.get_pixel(3, 3).0, [255, 255, 0, 255]);
}

#[tokio::test]
async fn rapid_identical_submissions_coalesce() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 8, "height": 8},
        "layers": [{"type": "static", "url": png_data_url(8, 8, [77, 77, 77, 255])}]
    });

    let first = app.submit_ok(&payload).await;
    let second = app.submit_ok(&payload).await;
    assert_ne!(first, second);

    let a = app.poll_until_terminal(&first).await;
    let b = app.poll_until_terminal(&second).await;
    assert_eq!(a["status"], "done");
    assert_eq!(b["status"], "done");
    assert_eq!(a["url"], b["url"]);
    assert_eq!(app.state.registry.len(), 2);
}

#[tokio::test]
async fn poll_progresses_monotonically_to_done() {
    let app = TestApp::new();

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 4, "height": 4},
        "layers": [{"type": "static", "url": png_data_url(4, 4, [200, 100, 50, 255])}]
    });

    let id = app.submit_ok(&payload).await;
    let record = app.poll_until_terminal(&id).await;
    assert_eq!(record["status"], "done");
    assert!(record.get("createdAt").is_some());
    assert!(record.get("finishedAt").is_some());

    // Terminal state is sticky.
    let again = app.poll_until_terminal(&id).await;
    assert_eq!(again["status"], "done");
    assert_eq!(again["url"], record["url"]);
}
