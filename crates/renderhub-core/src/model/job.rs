//! Job payload, options, and registry-owned job state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layer::LayerSpec;

/// Default canvas edge when the payload omits a dimension.
pub const DEFAULT_CANVAS_SIZE: u32 = 300;

/// Default GIF frame delay in milliseconds.
pub const DEFAULT_GIF_DELAY_MS: u32 = 180;

/// Default GIF quantization quality (lower is better, 1–30).
pub const DEFAULT_GIF_QUALITY: u32 = 10;

/// Requested output canvas size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Size {
    /// Canvas width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Canvas height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
}

/// GIF encoding options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GifOptions {
    /// Frame delay in milliseconds (default 180).
    #[serde(default)]
    pub delay_ms: Option<u32>,
    /// Loop count; 0 means infinite (default 0).
    #[serde(default)]
    pub repeat: Option<u32>,
    /// Quantization quality 1–30, lower is better (default 10).
    #[serde(default)]
    pub quality: Option<u32>,
    /// Whether to key a color to transparency.
    #[serde(default)]
    pub transparent: Option<bool>,
    /// Color keyed to transparency when `transparent` is set.
    #[serde(default)]
    pub transparent_color_hex: Option<String>,
    /// Canvas fill before each frame.
    #[serde(default)]
    pub background_color_hex: Option<String>,
}

/// A layered-render job as submitted on the wire.
///
/// `guild` and `user` are opaque caller identifiers; they are required
/// for validation but never affect the produced pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    /// Opaque caller identifier.
    pub guild: String,
    /// Opaque caller identifier.
    pub user: String,
    /// Output canvas size; defaults to 300×300.
    #[serde(default)]
    pub size: Option<Size>,
    /// Requested output format: `"gif"`, `"png"`, or absent.
    #[serde(default)]
    pub format: Option<String>,
    /// Layers in draw order.
    pub layers: Vec<LayerSpec>,
    /// GIF encoding options.
    #[serde(default)]
    pub gif_options: Option<GifOptions>,
    /// Canvas fill color.
    #[serde(default)]
    pub background_color_hex: Option<String>,
}

impl JobPayload {
    /// Concrete canvas dimensions with defaults applied.
    pub fn dimensions(&self) -> (u32, u32) {
        let size = self.size.unwrap_or_default();
        (
            size.width.unwrap_or(DEFAULT_CANVAS_SIZE),
            size.height.unwrap_or(DEFAULT_CANVAS_SIZE),
        )
    }

    /// Whether the job should produce a GIF: explicitly requested, or any
    /// layer declares frames.
    pub fn wants_gif(&self) -> bool {
        self.format.as_deref() == Some("gif") || self.layers.iter().any(LayerSpec::is_animated)
    }

    /// Largest declared frame count across animated layers.
    pub fn max_declared_frames(&self) -> usize {
        self.layers
            .iter()
            .map(LayerSpec::frame_count)
            .max()
            .unwrap_or(0)
    }
}

/// Output raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single-frame raster.
    Png,
    /// Animated raster.
    Gif,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// MIME type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    /// Infer the format from a URL or file-name suffix.
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".gif") {
            Self::Gif
        } else {
            Self::Png
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Status of a render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, render in progress.
    Pending,
    /// Finished; artifact URL available.
    Done,
    /// Failed; error message available.
    Error,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registry-owned state of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Unique job identifier.
    pub id: Uuid,
    /// Current status.
    pub status: JobStatus,
    /// When the job was accepted.
    pub created_at: DateTime<Utc>,
    /// When the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Artifact URL once done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Artifact format once done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Error message once failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The original payload.
    pub payload: JobPayload,
}

impl JobRecord {
    /// Create a fresh pending record for an accepted payload.
    pub fn pending(payload: JobPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            finished_at: None,
            url: None,
            format: None,
            error: None,
            payload,
        }
    }
}
