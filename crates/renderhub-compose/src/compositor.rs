//! Layer compositor: single-frame PNG and multi-frame GIF assembly.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use tracing::{debug, warn};

use renderhub_assets::AssetPipeline;
use renderhub_core::config::{AssetsConfig, RenderConfig};
use renderhub_core::error::AppError;
use renderhub_core::model::job::DEFAULT_GIF_QUALITY;
use renderhub_core::model::{parse_hex_color, GifOptions, OutputFormat, Rect};
use renderhub_core::result::AppResult;

use crate::canvas::Canvas;
use crate::par::bounded_map;

/// One frame of a resolved animated layer.
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    /// Frame source URL.
    pub url: String,
    /// Draw rectangle (frame → layer → canvas inheritance already applied).
    pub rect: Rect,
}

/// A layer after URL resolution, ready for compositing.
#[derive(Debug, Clone)]
pub enum ResolvedLayer {
    /// Single-bitmap layer.
    Static {
        /// Source URL.
        url: String,
        /// Draw rectangle.
        rect: Rect,
    },
    /// Ordered multi-frame layer.
    Animated {
        /// Frames in declared order.
        frames: Vec<ResolvedFrame>,
    },
}

impl ResolvedLayer {
    /// The single URL drawn when this layer is composited statically.
    ///
    /// Animated layers contribute their first frame.
    fn primary_target(&self) -> Option<(String, Rect)> {
        match self {
            Self::Static { url, rect } => Some((url.clone(), *rect)),
            Self::Animated { frames } => {
                frames.first().map(|frame| (frame.url.clone(), frame.rect))
            }
        }
    }
}

/// A finished composition.
#[derive(Debug, Clone)]
pub struct Composed {
    /// Actual output format (a GIF request degrades to PNG when no
    /// animated layer survives).
    pub format: OutputFormat,
    /// Encoded raster bytes.
    pub bytes: Vec<u8>,
}

/// A layer with its bitmaps loaded, retaining input order.
enum LoadedLayer {
    Static { image: Arc<RgbaImage>, rect: Rect },
    Animated { frames: Vec<(Arc<RgbaImage>, Rect)> },
}

/// Draws layers in declared order onto a canvas and encodes the output.
#[derive(Debug, Clone)]
pub struct Compositor {
    assets: Arc<AssetPipeline>,
    static_fetch_concurrency: usize,
    frame_fetch_concurrency: usize,
    default_gif_delay_ms: u32,
}

impl Compositor {
    /// Build a compositor sharing the given asset pipeline.
    pub fn new(assets: Arc<AssetPipeline>, config: &AssetsConfig, render: &RenderConfig) -> Self {
        Self {
            assets,
            static_fetch_concurrency: config.static_fetch_concurrency,
            frame_fetch_concurrency: config.frame_fetch_concurrency,
            default_gif_delay_ms: render.default_gif_delay_ms,
        }
    }

    /// Compose a single-frame PNG.
    ///
    /// Layers are fetched and decoded in parallel (bounded); a per-layer
    /// failure skips that layer and never fails the job.
    pub async fn compose_png(
        &self,
        width: u32,
        height: u32,
        layers: &[ResolvedLayer],
        background_hex: Option<&str>,
    ) -> AppResult<Vec<u8>> {
        let targets: Vec<(String, Rect)> = layers
            .iter()
            .filter_map(ResolvedLayer::primary_target)
            .collect();

        let loaded = bounded_map(targets, self.static_fetch_concurrency, |(url, rect)| {
            let assets = Arc::clone(&self.assets);
            async move { assets.load_image(&url).await.map(|image| (image, rect)) }
        })
        .await;

        let mut canvas = Canvas::new(width, height, background_hex);
        for (image, rect) in loaded.into_iter().flatten() {
            canvas.draw(&image, rect);
        }

        encode_png(canvas.into_image())
    }

    /// Compose a multi-frame GIF.
    ///
    /// Frame count is the longest surviving animated layer; shorter
    /// animations loop via modular indexing. When no animated layer
    /// survives, the result degrades to a PNG of the same layers.
    pub async fn compose_gif(
        &self,
        width: u32,
        height: u32,
        layers: &[ResolvedLayer],
        options: &GifOptions,
        background_hex: Option<&str>,
    ) -> AppResult<Composed> {
        let loaded = self.load_layers(layers).await;

        let frame_count = loaded
            .iter()
            .map(|layer| match layer {
                LoadedLayer::Animated { frames } => frames.len(),
                LoadedLayer::Static { .. } => 0,
            })
            .max()
            .unwrap_or(0);

        if frame_count == 0 {
            debug!("No animated layer survived, degrading to PNG");
            let bytes = self
                .compose_png(width, height, layers, background_hex)
                .await?;
            return Ok(Composed {
                format: OutputFormat::Png,
                bytes,
            });
        }

        let delay_ms = options.delay_ms.unwrap_or(self.default_gif_delay_ms);
        let repeat = options.repeat.unwrap_or(0);
        let speed = options.quality.unwrap_or(DEFAULT_GIF_QUALITY).clamp(1, 30) as i32;
        let transparent_key = options
            .transparent
            .unwrap_or(false)
            .then(|| options.transparent_color_hex.as_deref())
            .flatten()
            .and_then(parse_hex_color);

        let mut buffer = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut buffer, speed);
            encoder
                .set_repeat(if repeat == 0 {
                    Repeat::Infinite
                } else {
                    Repeat::Finite(repeat.min(u32::from(u16::MAX)) as u16)
                })
                .map_err(|e| AppError::encode(format!("GIF repeat setup failed: {e}")))?;

            let mut canvas = Canvas::new(width, height, background_hex);
            for frame_index in 0..frame_count {
                canvas.reset();
                for layer in &loaded {
                    match layer {
                        LoadedLayer::Static { image, rect } => canvas.draw(image, *rect),
                        LoadedLayer::Animated { frames } => {
                            let (image, rect) = &frames[frame_index % frames.len()];
                            canvas.draw(image, *rect);
                        }
                    }
                }

                let mut pixels = canvas.image().clone();
                if let Some(key) = transparent_key {
                    key_out_color(&mut pixels, key);
                }

                encoder
                    .encode_frame(Frame::from_parts(
                        pixels,
                        0,
                        0,
                        Delay::from_numer_denom_ms(delay_ms, 1),
                    ))
                    .map_err(|e| AppError::encode(format!("GIF frame encode failed: {e}")))?;
            }
        }

        Ok(Composed {
            format: OutputFormat::Gif,
            bytes: buffer,
        })
    }

    /// Load every layer's bitmaps, dropping layers (and frames) that fail.
    async fn load_layers(&self, layers: &[ResolvedLayer]) -> Vec<LoadedLayer> {
        let mut loaded = Vec::with_capacity(layers.len());

        for layer in layers {
            match layer {
                ResolvedLayer::Static { url, rect } => match self.assets.load_image(url).await {
                    Ok(image) => loaded.push(LoadedLayer::Static { image, rect: *rect }),
                    Err(err) => {
                        warn!(url, error = %err, "Static layer failed to load, skipping");
                    }
                },
                ResolvedLayer::Animated { frames } => {
                    let surviving: Vec<(Arc<RgbaImage>, Rect)> =
                        bounded_map(frames.clone(), self.frame_fetch_concurrency, |frame| {
                            let assets = Arc::clone(&self.assets);
                            async move {
                                assets
                                    .load_image(&frame.url)
                                    .await
                                    .map(|image| (image, frame.rect))
                            }
                        })
                        .await
                        .into_iter()
                        .flatten()
                        .collect();

                    if surviving.is_empty() {
                        warn!("Animated layer lost every frame, skipping");
                    } else {
                        loaded.push(LoadedLayer::Animated { frames: surviving });
                    }
                }
            }
        }

        loaded
    }
}

fn encode_png(image: RgbaImage) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .map_err(|e| AppError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buffer)
}

/// Set alpha to zero wherever RGB matches the keyed color.
fn key_out_color(image: &mut RgbaImage, key: [u8; 3]) {
    for pixel in image.pixels_mut() {
        if pixel.0[..3] == key {
            pixel.0[3] = 0;
        }
    }
}
