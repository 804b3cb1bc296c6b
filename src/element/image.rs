use std::sync::Arc;

use egui::Vec2;
use image::RgbaImage;
use log::info;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{FryError, Result};

/// Decoded, read-only bitmap shared between the scene and the glyph cache.
#[derive(Clone)]
pub struct Bitmap {
    pixmap: Arc<Pixmap>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Bitmap {
    /// Decode PNG/JPEG/... bytes into a bitmap
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        info!("🖼️ Decoded bitmap {}x{}", decoded.width(), decoded.height());
        Self::from_rgba(&decoded.to_rgba8())
    }

    /// Build a bitmap from straight (non-premultiplied) RGBA pixels
    pub fn from_rgba(rgba: &RgbaImage) -> Result<Self> {
        let (width, height) = rgba.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(FryError::InvalidFrame { width, height })?;

        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        Ok(Self {
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Height divided by width
    pub fn aspect(&self) -> f32 {
        self.height() as f32 / self.width() as f32
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
pub(crate) fn solid_bitmap(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    let image = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    Bitmap::from_rgba(&image).unwrap()
}
