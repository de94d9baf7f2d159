//! Stable content hash of the normalized job description.
//!
//! Only fields that affect pixels participate: size, layers (canonical
//! types, slugified keys, normalized draw rectangles, frame lists),
//! format, GIF options, and the canvas background. `guild`, `user`, and
//! unknown fields never change the hash.

use serde_json::{json, Value};
use sha1::{Digest, Sha1};

use renderhub_core::model::job::{DEFAULT_GIF_DELAY_MS, DEFAULT_GIF_QUALITY};
use renderhub_core::model::{slugify, GifOptions, JobPayload, LayerKind, LayerSpec, Rect};

/// SHA-1 hex of the canonical JSON serialization of the normalized job.
pub fn fingerprint(payload: &JobPayload) -> String {
    let canonical = canonical_value(payload);
    let digest = Sha1::digest(canonical.to_string().as_bytes());
    hex::encode(digest)
}

fn canonical_value(payload: &JobPayload) -> Value {
    let (width, height) = payload.dimensions();

    // Keys are inserted alphabetically at every level so the
    // serialization is canonical regardless of map backing.
    json!({
        "backgroundColorHex": payload.background_color_hex,
        "format": payload.format,
        "gifOptions": canonical_gif_options(payload.gif_options.as_ref()),
        "layers": payload
            .layers
            .iter()
            .map(|layer| canonical_layer(layer, width, height))
            .collect::<Vec<Value>>(),
        "size": { "height": height, "width": width },
    })
}

fn canonical_gif_options(options: Option<&GifOptions>) -> Value {
    let defaults = GifOptions::default();
    let options = options.unwrap_or(&defaults);
    json!({
        "backgroundColorHex": options.background_color_hex,
        "delayMs": options.delay_ms.unwrap_or(DEFAULT_GIF_DELAY_MS),
        "quality": options.quality.unwrap_or(DEFAULT_GIF_QUALITY),
        "repeat": options.repeat.unwrap_or(0),
        "transparent": options.transparent.unwrap_or(false),
        "transparentColorHex": options.transparent_color_hex,
    })
}

fn canonical_layer(layer: &LayerSpec, width: u32, height: u32) -> Value {
    let kind = LayerKind::parse(&layer.kind);
    let type_name = kind.map_or_else(
        || layer.kind.to_ascii_lowercase(),
        |k| k.canonical_name().to_string(),
    );
    let layer_rect = layer.rect.unwrap_or_default();

    if let Some(frames) = layer.frames.as_ref().filter(|f| !f.is_empty()) {
        return json!({
            "frames": frames
                .iter()
                .map(|frame| json!({
                    "rect": canonical_rect(frame.rect.unwrap_or(layer_rect), width, height),
                    "url": frame.url,
                }))
                .collect::<Vec<Value>>(),
            "type": type_name,
        });
    }

    json!({
        "key": layer.key.as_deref().map(slugify).unwrap_or_default(),
        "rect": canonical_rect(layer_rect, width, height),
        "type": type_name,
        "url": layer.url,
    })
}

fn canonical_rect(rect: Rect, width: u32, height: u32) -> Value {
    let (x, y, w, h) = rect.resolve(width, height);
    json!({ "h": h, "w": w, "x": x, "y": y })
}
