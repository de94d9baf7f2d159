//! Compositing and output configuration.

use serde::{Deserialize, Serialize};

/// Render pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Maximum accepted canvas width in pixels.
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    /// Maximum accepted canvas height in pixels.
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    /// Maximum accepted layer count per job.
    #[serde(default = "default_max_layers")]
    pub max_layers: usize,
    /// Maximum accepted frame count per animated layer.
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    /// Number of renders allowed to run concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Frame delay in milliseconds when a GIF job does not specify one.
    #[serde(default = "default_gif_delay_ms")]
    pub default_gif_delay_ms: u32,
    /// Directory artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            max_layers: default_max_layers(),
            max_frames: default_max_frames(),
            concurrency: default_concurrency(),
            default_gif_delay_ms: default_gif_delay_ms(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_max_dimension() -> u32 {
    1024
}

fn default_max_layers() -> usize {
    50
}

fn default_max_frames() -> usize {
    120
}

fn default_concurrency() -> usize {
    4
}

fn default_gif_delay_ms() -> u32 {
    180
}

fn default_output_dir() -> String {
    "data/out".to_string()
}
