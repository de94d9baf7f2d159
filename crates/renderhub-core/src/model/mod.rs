//! Domain model: layers, jobs, GIF options, colors.

pub mod color;
pub mod job;
pub mod layer;

pub use self::color::parse_hex_color;
pub use self::job::{GifOptions, JobPayload, JobRecord, JobStatus, OutputFormat, Size};
pub use self::layer::{slugify, FrameSpec, LayerKind, LayerSpec, Rect};
