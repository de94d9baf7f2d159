//! End-to-end tests driving the axum router in-process.

mod api_test;
mod fallback_test;
mod helpers;
mod pipeline_test;
