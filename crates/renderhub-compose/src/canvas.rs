//! Mutable RGBA draw surface.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use renderhub_core::model::{parse_hex_color, Rect};

/// A W×H RGBA canvas with an optional background fill.
///
/// An invalid background color string is ignored silently; the canvas
/// then clears to fully transparent black.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    background: Option<Rgba<u8>>,
}

impl Canvas {
    /// Create a cleared canvas.
    pub fn new(width: u32, height: u32, background_hex: Option<&str>) -> Self {
        let background = background_hex
            .and_then(parse_hex_color)
            .map(|[r, g, b]| Rgba([r, g, b, 255]));

        let mut canvas = Self {
            image: RgbaImage::new(width, height),
            background,
        };
        canvas.reset();
        canvas
    }

    /// Clear to the background fill (or transparent).
    pub fn reset(&mut self) {
        let fill = self.background.unwrap_or(Rgba([0, 0, 0, 0]));
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    /// Alpha-composite a bitmap into a draw rectangle, scaling to fit.
    pub fn draw(&mut self, source: &RgbaImage, rect: Rect) {
        let (x, y, w, h) = rect.resolve(self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return;
        }

        if source.dimensions() == (w, h) {
            imageops::overlay(&mut self.image, source, x, y);
        } else {
            let scaled = imageops::resize(source, w, h, FilterType::Triangle);
            imageops::overlay(&mut self.image, &scaled, x, y);
        }
    }

    /// Borrow the pixel buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
