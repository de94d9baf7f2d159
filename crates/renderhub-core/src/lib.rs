//! # renderhub-core
//!
//! Core crate for RenderHub. Contains configuration schemas, the domain
//! model (layers, jobs, GIF options), and the unified error system.
//!
//! This crate has **no** internal dependencies on other RenderHub crates.

pub mod config;
pub mod error;
pub mod model;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
