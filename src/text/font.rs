use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};

use super::TextMeasure;
use crate::config::FryConfig;
use crate::error::{FryError, Result};

// Name of the proportional font bundled with egui's default fonts
const BUNDLED_FONT: &str = "Ubuntu-Light";
// egui's bundled faces tried for characters the main font lacks
const BUNDLED_FALLBACKS: [&str; 2] = ["NotoEmoji-Regular", "emoji-icon-font"];

/// Outline font used to measure and rasterize text clusters, with fallback
/// faces for characters it has no glyph for
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    fallbacks: Vec<FontArc>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("glyphs", &self.font.glyph_count())
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}

/// Scale at which the em square is `font_size` pixels tall
fn em_scale(font: &FontArc, font_size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(font_size * font.height_unscaled() / units),
        _ => PxScale::from(font_size),
    }
}

fn bundled_font(definitions: &egui::FontDefinitions, name: &str) -> Result<FontArc> {
    let data = definitions
        .font_data
        .get(name)
        .ok_or_else(|| FryError::Font(format!("{name} is not bundled")))?;
    FontArc::try_from_vec(data.font.to_vec()).map_err(|e| FryError::Font(e.to_string()))
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| FryError::Font(e.to_string()))?;
        Ok(Self {
            font,
            fallbacks: Vec::new(),
        })
    }

    /// Font file from disk, backed by egui's bundled emoji faces
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading font {}", path.display());
        let mut face = Self::from_bytes(std::fs::read(path)?)?;
        face.fallbacks = Self::bundled_fallbacks(&egui::FontDefinitions::default());
        Ok(face)
    }

    /// The proportional font shipped with egui
    pub fn bundled() -> Result<Self> {
        let definitions = egui::FontDefinitions::default();
        Ok(Self {
            font: bundled_font(&definitions, BUNDLED_FONT)?,
            fallbacks: Self::bundled_fallbacks(&definitions),
        })
    }

    fn bundled_fallbacks(definitions: &egui::FontDefinitions) -> Vec<FontArc> {
        BUNDLED_FALLBACKS
            .iter()
            .filter_map(|name| match bundled_font(definitions, name) {
                Ok(font) => Some(font),
                Err(e) => {
                    log::warn!("No fallback font: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn from_config(config: &FryConfig) -> Result<Self> {
        match &config.font_path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    // 0 is the main font, n is fallback n - 1
    fn face_index(&self, c: char) -> usize {
        if self.font.glyph_id(c) != GlyphId(0) {
            return 0;
        }
        self.fallbacks
            .iter()
            .position(|font| font.glyph_id(c) != GlyphId(0))
            .map_or(0, |i| i + 1)
    }

    fn face(&self, index: usize) -> &FontArc {
        match index {
            0 => &self.font,
            n => self.fallbacks.get(n - 1).unwrap_or(&self.font),
        }
    }

    /// Visit every glyph of `text` with its face, scale and pen offset.
    /// Returns the total advance.
    fn walk(
        &self,
        text: &str,
        font_size: f32,
        mut visit: impl FnMut(&FontArc, GlyphId, PxScale, f32),
    ) -> f32 {
        let mut caret = 0.0;
        let mut prev: Option<(usize, GlyphId)> = None;
        for c in text.chars() {
            let index = self.face_index(c);
            let font = self.face(index);
            let scaled = font.as_scaled(em_scale(font, font_size));
            let id = scaled.glyph_id(c);
            // Kerning only applies within one face
            if let Some((_, prev_id)) = prev.filter(|(i, _)| *i == index) {
                caret += scaled.kern(prev_id, id);
            }
            visit(font, id, scaled.scale(), caret);
            caret += scaled.h_advance(id);
            prev = Some((index, id));
        }
        caret
    }

    /// Rasterize `text` starting at `left`, vertically centered on
    /// `middle_y`. `plot` receives pixel coordinates and coverage in 0..=1.
    pub(crate) fn rasterize(
        &self,
        text: &str,
        left: f32,
        middle_y: f32,
        font_size: f32,
        mut plot: impl FnMut(i32, i32, f32),
    ) {
        let primary = self.font.as_scaled(em_scale(&self.font, font_size));
        let baseline = middle_y + (primary.ascent() + primary.descent()) / 2.0;

        self.walk(text, font_size, |font, id, scale, offset| {
            let glyph = id.with_scale_and_position(scale, point(left + offset, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    plot(
                        bounds.min.x as i32 + x as i32,
                        bounds.min.y as i32 + y as i32,
                        coverage,
                    )
                });
            }
        });
    }
}

impl TextMeasure for FontFace {
    fn advance(&self, cluster: &str, font_size: f32) -> f32 {
        self.walk(cluster, font_size, |_, _, _, _| {})
    }
}
