//! Shared test helpers for integration tests.

use std::io::Cursor;
use std::time::Duration;

use axum::body::Body;
use axum::Router;
use base64::Engine;
use http::header::HeaderMap;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use renderhub_api::{build_router, build_state, AppState};
use renderhub_core::config::AppConfig;

/// Test application context.
pub struct TestApp {
    /// Router for making in-process requests.
    pub router: Router,
    /// Shared application state.
    pub state: AppState,
    _output_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a test application with a throwaway artifact directory.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after tweaking the default config.
    pub fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let output_dir = tempfile::tempdir().expect("Failed to create temp output dir");

        let mut config = AppConfig::default();
        config.assets.base_url = "http://cdn.invalid".to_string();
        config.render.output_dir = output_dir.path().to_string_lossy().into_owned();
        tweak(&mut config);

        let state = build_state(config).expect("Failed to build state");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            _output_dir: output_dir,
        }
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send_json(request).await
    }

    /// POST a JSON body with a bearer token.
    pub async fn post_json_bearer(
        &self,
        uri: &str,
        body: &Value,
        token: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send_json(request).await
    }

    /// GET a URI and parse the JSON response.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send_json(request).await
    }

    /// GET a URI and return status, headers, and raw body bytes.
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Poll a job until it leaves `pending`.
    pub async fn poll_until_terminal(&self, job_id: &str) -> Value {
        for _ in 0..400 {
            let (status, record) = self.get_json(&format!("/jobs/{job_id}")).await;
            assert_eq!(status, StatusCode::OK);
            let job_status = record["status"].as_str().unwrap_or_default().to_string();
            if job_status != "pending" {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {job_id} never reached a terminal state");
    }

    /// Submit a payload expecting acceptance, returning the job id.
    pub async fn submit_ok(&self, payload: &Value) -> String {
        let (status, body) = self.post_json("/jobs", payload).await;
        assert_eq!(status, StatusCode::OK, "submit failed: {body}");
        body["jobId"].as_str().unwrap().to_string()
    }

    /// Submit, wait for completion, and return the terminal record.
    pub async fn render(&self, payload: &Value) -> Value {
        let id = self.submit_ok(payload).await;
        self.poll_until_terminal(&id).await
    }
}

/// Encode a solid-color PNG as a `data:` URL.
pub fn png_data_url(width: u32, height: u32, rgba: [u8; 4]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_bytes(width, height, rgba))
    )
}

/// Encode a solid-color PNG.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Encode a solid-color single-frame GIF.
pub fn gif_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut buf);
        encoder
            .encode_frame(image::Frame::new(img))
            .expect("GIF fixture encode failed");
    }
    buf
}

/// The `/out/<name>` path of a job record's artifact URL.
pub fn artifact_path(record: &Value) -> String {
    let url = record["url"].as_str().expect("record has no url");
    let idx = url.find("/out/").expect("url has no /out/ segment");
    url[idx..].to_string()
}

/// Spawn a stub CDN on an ephemeral port, returning its base URL.
pub async fn spawn_stub_cdn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
