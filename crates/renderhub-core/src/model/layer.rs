//! Layer model: raw wire form, canonical layer kinds, CDN path resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Blit destination on the output canvas, in output pixels.
///
/// Unspecified width/height default to the full canvas; missing x/y
/// default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    #[serde(default)]
    pub x: i64,
    /// Top edge.
    #[serde(default)]
    pub y: i64,
    /// Destination width.
    #[serde(default)]
    pub w: Option<u32>,
    /// Destination height.
    #[serde(default)]
    pub h: Option<u32>,
}

impl Rect {
    /// Concrete placement with canvas dimensions filling the gaps.
    pub fn resolve(&self, canvas_w: u32, canvas_h: u32) -> (i64, i64, u32, u32) {
        (
            self.x,
            self.y,
            self.w.unwrap_or(canvas_w),
            self.h.unwrap_or(canvas_h),
        )
    }
}

/// One frame of an animated layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSpec {
    /// Source URL for this frame.
    pub url: String,
    /// Optional per-frame draw rectangle; inherits the layer rectangle.
    #[serde(default)]
    pub rect: Option<Rect>,
}

/// A layer as submitted on the wire.
///
/// The `type` string accepts underscore, dash, and camelCase aliases;
/// [`LayerKind::parse`] normalizes them. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Layer type (e.g. `"floor"`, `"room-bg"`, `"pet_gif_frames"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Asset key, slugified into the CDN path.
    #[serde(default)]
    pub key: Option<String>,
    /// Explicit source URL (post-resolution form).
    #[serde(default)]
    pub url: Option<String>,
    /// Draw rectangle; defaults to the full canvas.
    #[serde(default)]
    pub rect: Option<Rect>,
    /// Ordered frame list for animated layers.
    #[serde(default)]
    pub frames: Option<Vec<FrameSpec>>,
}

impl LayerSpec {
    /// Whether this layer declares an ordered frame list.
    pub fn is_animated(&self) -> bool {
        self.frames.as_ref().is_some_and(|f| !f.is_empty())
    }

    /// Number of declared frames (0 for static layers).
    pub fn frame_count(&self) -> usize {
        self.frames.as_ref().map_or(0, |f| f.len())
    }
}

/// Canonical layer kinds recognized by the CDN path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    RoomBg,
    Floor,
    Furniture,
    WallpaperLeft,
    WallpaperRight,
    Static,
    PetGifFrames,
}

impl LayerKind {
    /// Parse a wire type string, folding underscore/dash/camelCase aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "background" => Some(Self::Background),
            "roombg" => Some(Self::RoomBg),
            "floor" => Some(Self::Floor),
            "furniture" => Some(Self::Furniture),
            "wallpaperleft" => Some(Self::WallpaperLeft),
            "wallpaperright" => Some(Self::WallpaperRight),
            "static" => Some(Self::Static),
            "petgifframes" => Some(Self::PetGifFrames),
            _ => None,
        }
    }

    /// Canonical wire name.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::RoomBg => "room-bg",
            Self::Floor => "floor",
            Self::Furniture => "furniture",
            Self::WallpaperLeft => "wallpaper-left",
            Self::WallpaperRight => "wallpaper-right",
            Self::Static => "static",
            Self::PetGifFrames => "pet_gif_frames",
        }
    }

    /// CDN path for this kind and key, per the path table.
    ///
    /// Background kinds fall back to `"default"` when the key is empty;
    /// typed kinds with an empty slug have no derivable path.
    pub fn cdn_path(&self, key: &str) -> Option<String> {
        let slug = slugify(key);
        match self {
            Self::Background | Self::RoomBg => {
                let name = if slug.is_empty() { "default" } else { &slug };
                Some(format!("/backgrounds/{name}.png"))
            }
            Self::Floor if !slug.is_empty() => Some(format!("/floor/{slug}.png")),
            Self::Furniture if !slug.is_empty() => Some(format!("/furniture/{slug}.png")),
            Self::WallpaperLeft if !slug.is_empty() => Some(format!("/wallpaper/left/{slug}.png")),
            Self::WallpaperRight if !slug.is_empty() => {
                Some(format!("/wallpaper/right/{slug}.png"))
            }
            _ => None,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Lowercase; any run of characters outside `[a-z0-9]` becomes `-`;
/// leading/trailing `-` trimmed.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
