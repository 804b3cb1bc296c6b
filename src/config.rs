use std::path::{Path, PathBuf};

use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Band text size relative to the strip height
const BAND_FONT_FACTOR: f32 = 0.6;

/// Tunable constants of the engine.
///
/// Every field has a default, so a config file only needs to list what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FryConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Band strip height as a fraction of the frame height
    pub band_height_ratio: f32,
    pub min_band_height: f32,
    /// Font size of a free text element at scale 1.0
    pub free_text_font_size: f32,
    /// Padding added around free text hit boxes, in canvas pixels
    pub hit_padding: f32,
    pub handle_radius: f32,
    pub handle_draw_radius: f32,
    /// Horizontal drag distance that adds 1.0 to an element's scale
    pub resize_sensitivity: f32,
    pub max_zoom: f32,
    pub debounce_secs: f64,
    pub degrade_quality: u8,
    pub export_quality: u8,
    pub contrast: f32,
    pub saturation: f32,
    pub tint_color: [u8; 3],
    pub tint_max_alpha: f32,
    /// Directory holding `<glyph-key>.png` emoji bitmaps
    pub emoji_dir: Option<PathBuf>,
    /// TTF/OTF used for text; egui's bundled font when absent
    pub font_path: Option<PathBuf>,
}

impl Default for FryConfig {
    fn default() -> Self {
        Self {
            frame_width: 540,
            frame_height: 960,
            band_height_ratio: 0.05,
            min_band_height: 30.0,
            free_text_font_size: 42.0,
            hit_padding: 20.0,
            handle_radius: 20.0,
            handle_draw_radius: 8.0,
            resize_sensitivity: 200.0,
            max_zoom: 3.0,
            debounce_secs: 0.4,
            degrade_quality: 10,
            export_quality: 90,
            contrast: 1.25,
            saturation: 1.4,
            tint_color: [138, 43, 226],
            tint_max_alpha: 0.6,
            emoji_dir: None,
            font_path: None,
        }
    }
}

impl FryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.frame_width as f32, self.frame_height as f32)
    }

    pub fn band_height(&self) -> f32 {
        self.min_band_height
            .max(self.frame_height as f32 * self.band_height_ratio)
    }

    pub fn band_font_size(&self) -> f32 {
        self.band_height() * BAND_FONT_FACTOR
    }
}
