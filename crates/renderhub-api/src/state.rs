//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use renderhub_assets::AssetPipeline;
use renderhub_compose::Compositor;
use renderhub_core::config::AppConfig;
use renderhub_core::result::AppResult;
use renderhub_jobs::{ArtifactStore, JobRegistry, RenderPlanner};

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped (or internally shared) for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Job registry (submit/poll state).
    pub registry: Arc<JobRegistry>,
    /// Artifact store (content-addressed output files).
    pub artifacts: Arc<ArtifactStore>,
    /// Render planner (validation, dedup, compositing).
    pub planner: RenderPlanner,
}

/// Construct the full dependency graph from configuration.
pub fn build_state(config: AppConfig) -> AppResult<AppState> {
    let config = Arc::new(config);

    let registry = Arc::new(JobRegistry::new());
    let artifacts = Arc::new(ArtifactStore::new(
        &config.render.output_dir,
        &config.server.public_base_url,
    ));
    let assets = Arc::new(AssetPipeline::new(&config.assets)?);
    let compositor = Arc::new(Compositor::new(assets, &config.assets, &config.render));
    let planner = RenderPlanner::new(
        Arc::clone(&registry),
        Arc::clone(&artifacts),
        compositor,
        &config,
    );

    Ok(AppState {
        config,
        registry,
        artifacts,
        planner,
    })
}
