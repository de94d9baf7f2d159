//! Render planner: validation, layer URL resolution, dedup, and the
//! global render semaphore.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use uuid::Uuid;

use renderhub_compose::{Composed, Compositor, ResolvedFrame, ResolvedLayer};
use renderhub_core::config::{AppConfig, RenderConfig};
use renderhub_core::error::AppError;
use renderhub_core::model::{JobPayload, JobRecord, LayerKind, LayerSpec, OutputFormat};
use renderhub_core::result::AppResult;

use crate::artifacts::{ArtifactRef, ArtifactStore};
use crate::fingerprint::fingerprint;
use crate::inflight::{InflightTable, Joined};
use crate::registry::JobRegistry;

/// Accepts jobs, coalesces identical in-flight renders, and drives the
/// compositor behind the global render semaphore.
///
/// Cheap to clone; all heavyweight state is shared.
#[derive(Clone)]
pub struct RenderPlanner {
    registry: Arc<JobRegistry>,
    artifacts: Arc<ArtifactStore>,
    compositor: Arc<Compositor>,
    inflight: Arc<InflightTable>,
    render_gate: Arc<Semaphore>,
    asset_base_url: String,
    limits: RenderConfig,
}

impl RenderPlanner {
    /// Wire a planner from its collaborators and configuration.
    pub fn new(
        registry: Arc<JobRegistry>,
        artifacts: Arc<ArtifactStore>,
        compositor: Arc<Compositor>,
        config: &AppConfig,
    ) -> Self {
        Self {
            registry,
            artifacts,
            compositor,
            inflight: Arc::new(InflightTable::new()),
            render_gate: Arc::new(Semaphore::new(config.render.concurrency.max(1))),
            asset_base_url: config.assets.base_url.trim_end_matches('/').to_string(),
            limits: config.render.clone(),
        }
    }

    /// Validate a payload, record it as pending, and enqueue its render
    /// task. Returns the fresh job id immediately.
    pub fn submit(&self, payload: JobPayload) -> AppResult<Uuid> {
        self.validate(&payload)?;

        let record = self.registry.insert_pending(payload);
        let id = record.id;
        info!(job = %id, "Job accepted");

        let planner = self.clone();
        tokio::spawn(async move {
            planner.run_job(id, record.payload).await;
        });

        Ok(id)
    }

    /// Snapshot the current record for a job.
    pub fn poll(&self, id: Uuid) -> AppResult<JobRecord> {
        self.registry
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("Unknown job: {id}")))
    }

    fn validate(&self, payload: &JobPayload) -> AppResult<()> {
        if payload.guild.trim().is_empty() {
            return Err(AppError::validation("guild is required"));
        }
        if payload.user.trim().is_empty() {
            return Err(AppError::validation("user is required"));
        }

        let (width, height) = payload.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::validation("size dimensions must be positive"));
        }
        if width > self.limits.max_width {
            return Err(AppError::validation(format!(
                "width {width} exceeds maximum {}",
                self.limits.max_width
            )));
        }
        if height > self.limits.max_height {
            return Err(AppError::validation(format!(
                "height {height} exceeds maximum {}",
                self.limits.max_height
            )));
        }
        if payload.layers.len() > self.limits.max_layers {
            return Err(AppError::validation(format!(
                "layer count {} exceeds maximum {}",
                payload.layers.len(),
                self.limits.max_layers
            )));
        }
        if payload.max_declared_frames() > self.limits.max_frames {
            return Err(AppError::validation(format!(
                "frame count {} exceeds maximum {}",
                payload.max_declared_frames(),
                self.limits.max_frames
            )));
        }
        Ok(())
    }

    async fn run_job(&self, id: Uuid, payload: JobPayload) {
        match self.render(&payload).await {
            Ok(artifact) => {
                info!(job = %id, url = %artifact.url, "Job done");
                self.registry.mark_done(id, artifact.url, artifact.format);
            }
            Err(err) => {
                error!(job = %id, error = %err, "Job failed");
                self.registry.mark_error(id, err.to_string());
            }
        }
    }

    /// The render task: artifact cache, dedup join, or a fresh render.
    async fn render(&self, payload: &JobPayload) -> AppResult<ArtifactRef> {
        let fp = fingerprint(payload);

        loop {
            if let Some(hit) = self.artifacts.lookup(&fp).await {
                return Ok(hit);
            }

            let joined = self
                .inflight
                .join_or_lead(&fp, {
                    let planner = self.clone();
                    let fp = fp.clone();
                    let payload = payload.clone();
                    move || {
                        async move { planner.render_fresh(&fp, &payload).await }.boxed()
                    }
                })
                .await;

            match joined {
                Joined::Leader(pending) => {
                    let result = pending.await;
                    self.inflight.finish(&fp).await;
                    return result;
                }
                Joined::Follower(pending) => match pending.await {
                    Ok(leading) => {
                        // Followers adopt the leader's URL; the format is
                        // inferred from its suffix.
                        return Ok(ArtifactRef {
                            format: OutputFormat::from_url(&leading.url),
                            url: leading.url,
                        });
                    }
                    Err(err) => {
                        debug!(fingerprint = %fp, error = %err, "Dedup leader failed, retrying full pipeline");
                    }
                },
            }
        }
    }

    async fn render_fresh(&self, fingerprint: &str, payload: &JobPayload) -> AppResult<ArtifactRef> {
        let resolved = resolve_layers(&payload.layers, &self.asset_base_url);
        let (width, height) = payload.dimensions();

        let permit = self
            .render_gate
            .acquire()
            .await
            .map_err(|_| AppError::internal("Render semaphore closed"))?;

        let composed = if payload.wants_gif() {
            let options = payload.gif_options.clone().unwrap_or_default();
            let background = options
                .background_color_hex
                .clone()
                .or_else(|| payload.background_color_hex.clone());
            self.compositor
                .compose_gif(width, height, &resolved, &options, background.as_deref())
                .await?
        } else {
            let bytes = self
                .compositor
                .compose_png(
                    width,
                    height,
                    &resolved,
                    payload.background_color_hex.as_deref(),
                )
                .await?;
            Composed {
                format: OutputFormat::Png,
                bytes,
            }
        };

        let artifact = self
            .artifacts
            .write(fingerprint, composed.format, &composed.bytes)
            .await?;
        drop(permit);
        Ok(artifact)
    }
}

/// Resolve input layers to fetchable form.
///
/// Explicit URLs are kept, animated frame lists pass through with rect
/// inheritance applied, CDN-typed layers derive their URL from the path
/// table, and underivable layers are dropped.
pub fn resolve_layers(layers: &[LayerSpec], asset_base_url: &str) -> Vec<ResolvedLayer> {
    layers
        .iter()
        .filter_map(|layer| resolve_layer(layer, asset_base_url))
        .collect()
}

fn resolve_layer(layer: &LayerSpec, asset_base_url: &str) -> Option<ResolvedLayer> {
    let rect = layer.rect.unwrap_or_default();

    if let Some(url) = layer.url.as_ref().filter(|u| !u.is_empty()) {
        return Some(ResolvedLayer::Static {
            url: url.clone(),
            rect,
        });
    }

    if let Some(frames) = layer.frames.as_ref().filter(|f| !f.is_empty()) {
        return Some(ResolvedLayer::Animated {
            frames: frames
                .iter()
                .map(|frame| ResolvedFrame {
                    url: frame.url.clone(),
                    rect: frame.rect.unwrap_or(rect),
                })
                .collect(),
        });
    }

    let kind = LayerKind::parse(&layer.kind);
    let path = kind.and_then(|k| k.cdn_path(layer.key.as_deref().unwrap_or_default()));
    match path {
        Some(path) => Some(ResolvedLayer::Static {
            url: format!("{asset_base_url}{path}"),
            rect,
        }),
        None => {
            debug!(kind = %layer.kind, "Layer has no derivable URL, dropping");
            None
        }
    }
}
