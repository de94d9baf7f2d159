//! CDN resolution and `.png`↔`.gif` extension fallback against a stub
//! asset server.

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::helpers::{artifact_path, gif_bytes, png_bytes, spawn_stub_cdn, TestApp};

fn stub_cdn_router() -> Router {
    let background = png_bytes(8, 8, [0, 0, 200, 255]);
    let floor = gif_bytes(8, 8, [200, 0, 0, 255]);

    Router::new()
        .route(
            "/backgrounds/default.png",
            get(move || {
                let bytes = background.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], bytes) }
            }),
        )
        // The floor asset only exists as a GIF; the `.png` probe 404s.
        .route(
            "/floor/wood-01.gif",
            get(move || {
                let bytes = floor.clone();
                async move { ([(header::CONTENT_TYPE, "image/gif")], bytes) }
            }),
        )
        .fallback(|| async { StatusCode::NOT_FOUND })
}

#[tokio::test]
async fn missing_png_falls_back_to_gif() {
    let cdn_url = spawn_stub_cdn(stub_cdn_router()).await;
    let app = TestApp::with_config(move |config| {
        config.assets.base_url = cdn_url;
    });

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 8, "height": 8},
        "layers": [
            {"type": "background", "key": "default"},
            {"type": "floor", "key": "Wood 01"}
        ]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");
    assert_eq!(record["format"], "png");

    let (status, _, bytes) = app.get_raw(&artifact_path(&record)).await;
    assert_eq!(status, StatusCode::OK);

    // The floor bitmap made it into the output despite the 404 at .png.
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    let px = decoded.get_pixel(4, 4).0;
    assert!(px[0] > 150 && px[2] < 100, "expected floor red, got {px:?}");
}

#[tokio::test]
async fn upstream_failure_drops_only_that_layer() {
    let cdn_url = spawn_stub_cdn(stub_cdn_router()).await;
    let app = TestApp::with_config(move |config| {
        config.assets.base_url = cdn_url;
    });

    let payload = json!({
        "guild": "g",
        "user": "u",
        "size": {"width": 8, "height": 8},
        "layers": [
            {"type": "background", "key": "default"},
            {"type": "furniture", "key": "missing-sofa"}
        ]
    });

    let record = app.render(&payload).await;
    assert_eq!(record["status"], "done");

    let (_, _, bytes) = app.get_raw(&artifact_path(&record)).await;
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    // Only the background survives.
    assert_eq!(decoded.get_pixel(4, 4).0, [0, 0, 200, 255]);
}
