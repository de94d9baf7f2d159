//! In-flight render table: fingerprint → shared pending result.
//!
//! The check-hit-join and check-miss-insert form one critical section
//! per fingerprint; both happen under a single lock so concurrent
//! identical jobs can never start duplicate renders.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use renderhub_core::error::AppError;

use crate::artifacts::ArtifactRef;

/// The shared pending result of one in-flight render.
pub type SharedRender = Shared<BoxFuture<'static, Result<ArtifactRef, AppError>>>;

/// Outcome of joining the table for a fingerprint.
pub enum Joined {
    /// This caller started the render and must drive it (and call
    /// [`InflightTable::finish`] afterwards).
    Leader(SharedRender),
    /// Another render is already producing this artifact.
    Follower(SharedRender),
}

/// Fingerprint-keyed dedup table.
#[derive(Default)]
pub struct InflightTable {
    inner: Mutex<HashMap<String, SharedRender>>,
}

impl InflightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join an existing render for `fingerprint`, or install `make()`'s
    /// future as the new in-flight render.
    pub async fn join_or_lead<F>(&self, fingerprint: &str, make: F) -> Joined
    where
        F: FnOnce() -> BoxFuture<'static, Result<ArtifactRef, AppError>>,
    {
        let mut table = self.inner.lock().await;
        if let Some(existing) = table.get(fingerprint) {
            return Joined::Follower(existing.clone());
        }

        let shared = make().shared();
        table.insert(fingerprint.to_string(), shared.clone());
        Joined::Leader(shared)
    }

    /// Remove a completed render from the table.
    pub async fn finish(&self, fingerprint: &str) {
        self.inner.lock().await.remove(fingerprint);
    }

    /// Number of renders currently in flight.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
