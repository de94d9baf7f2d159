//! # renderhub-api
//!
//! The HTTP boundary: translates job submission and polling to and from
//! the wire, serves finished artifacts with immutable caching headers,
//! and wires the render pipeline into an axum application.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::{build_state, AppState};
