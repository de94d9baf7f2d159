//! # renderhub-jobs
//!
//! The asynchronous job lifecycle: payload fingerprinting, the
//! content-addressed artifact store, the in-memory job registry, the
//! in-flight dedup table, and the planner that ties them to the
//! compositor behind a global render semaphore.

pub mod artifacts;
pub mod fingerprint;
pub mod inflight;
pub mod planner;
pub mod registry;

pub use artifacts::{ArtifactRef, ArtifactStore};
pub use fingerprint::fingerprint;
pub use planner::RenderPlanner;
pub use registry::JobRegistry;
