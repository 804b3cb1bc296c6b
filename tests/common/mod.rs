use std::sync::Arc;

use fry_studio::text::{FetchMode, FontFace, GlyphCache, NoGlyphSource};
use fry_studio::{Bitmap, Editor, FryConfig, Renderer};

pub fn small_config() -> FryConfig {
    FryConfig {
        frame_width: 108,
        frame_height: 192,
        ..FryConfig::default()
    }
}

pub fn glyphs() -> GlyphCache {
    GlyphCache::new(Arc::new(NoGlyphSource), FetchMode::Inline)
}

#[allow(dead_code)]
pub fn renderer(config: FryConfig) -> Renderer {
    Renderer::new(config, FontFace::bundled().unwrap(), glyphs())
}

#[allow(dead_code)]
pub fn editor() -> Editor {
    Editor::with_parts(small_config(), FontFace::bundled().unwrap(), glyphs()).unwrap()
}

pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    Bitmap::from_rgba(&image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))).unwrap()
}
