use egui::Pos2;

mod common;
pub(crate) mod image;

pub use common::*;
pub use self::image::Bitmap;

use crate::id_generator::ElementId;

/// Full-width horizontal caption strip
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub text: String,
    /// Placement ratio within the vertical track `H - band_height`
    pub y: f32,
}

/// Free-floating text centered on a normalized position
#[derive(Debug, Clone, PartialEq)]
pub struct FreeText {
    pub text: String,
    pub pos: Pos2,
    pub scale: f32,
}

/// Bitmap overlay centered on a normalized position
#[derive(Debug, Clone)]
pub struct Sticker {
    pub bitmap: Bitmap,
    pub pos: Pos2,
    /// Drawn width as a fraction of the frame width
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Band(Band),
    FreeText(FreeText),
    Sticker(Sticker),
}

/// An overlay element of the scene.
///
/// `fry_score` decides when the element is inserted into the degradation
/// loop: 1.0 goes in first and is degraded the most, 0.0 goes in last and
/// stays clean.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    pub fry_score: f64,
    pub kind: ElementKind,
}

impl Element {
    pub(crate) fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            fry_score: DEFAULT_FRY_SCORE,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element_type(&self) -> &'static str {
        match &self.kind {
            ElementKind::Band(_) => "band",
            ElementKind::FreeText(_) => "text",
            ElementKind::Sticker(_) => "sticker",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Band(band) => Some(&band.text),
            ElementKind::FreeText(text) => Some(&text.text),
            ElementKind::Sticker(_) => None,
        }
    }

    /// Normalized position; bands report a centered x
    pub fn position(&self) -> Pos2 {
        match &self.kind {
            ElementKind::Band(band) => Pos2::new(0.5, band.y),
            ElementKind::FreeText(text) => text.pos,
            ElementKind::Sticker(sticker) => sticker.pos,
        }
    }

    /// Clamps into the variant's bounds; bands only take `y`.
    pub fn set_position(&mut self, pos: Pos2) {
        match &mut self.kind {
            ElementKind::Band(band) => band.y = clamp_f32(pos.y, &BAND_Y_RANGE),
            ElementKind::FreeText(FreeText { pos: p, .. })
            | ElementKind::Sticker(Sticker { pos: p, .. }) => {
                *p = Pos2::new(
                    clamp_f32(pos.x, &LOOSE_X_RANGE),
                    clamp_f32(pos.y, &LOOSE_Y_RANGE),
                );
            }
        }
    }

    pub fn scale(&self) -> Option<f32> {
        match &self.kind {
            ElementKind::Band(_) => None,
            ElementKind::FreeText(text) => Some(text.scale),
            ElementKind::Sticker(sticker) => Some(sticker.scale),
        }
    }

    pub fn scale_range(&self) -> Option<std::ops::RangeInclusive<f32>> {
        match &self.kind {
            ElementKind::Band(_) => None,
            ElementKind::FreeText(_) => Some(FREE_TEXT_SCALE_RANGE),
            ElementKind::Sticker(_) => Some(STICKER_SCALE_RANGE),
        }
    }

    /// Returns false for bands, which have no scale
    pub fn set_scale(&mut self, value: f32) -> bool {
        match &mut self.kind {
            ElementKind::Band(_) => false,
            ElementKind::FreeText(text) => {
                text.scale = clamp_f32(value, &FREE_TEXT_SCALE_RANGE);
                true
            }
            ElementKind::Sticker(sticker) => {
                sticker.scale = clamp_f32(value, &STICKER_SCALE_RANGE);
                true
            }
        }
    }

    /// Returns false for stickers, which carry no text
    pub fn set_text(&mut self, value: &str) -> bool {
        match &mut self.kind {
            ElementKind::Band(band) => {
                band.text = value.to_owned();
                true
            }
            ElementKind::FreeText(text) => {
                text.text = value.to_owned();
                true
            }
            ElementKind::Sticker(_) => false,
        }
    }

    pub fn set_fry_score(&mut self, value: f64) {
        self.fry_score = clamp_f64(value, &FRY_SCORE_RANGE);
    }

    pub fn is_band(&self) -> bool {
        matches!(self.kind, ElementKind::Band(_))
    }
}

/// Factory functions for creating elements with their defaults
pub mod factory {
    use super::*;

    pub fn create_band(id: ElementId) -> Element {
        Element::new(
            id,
            ElementKind::Band(Band {
                text: String::new(),
                y: 0.5,
            }),
        )
    }

    pub fn create_free_text(id: ElementId) -> Element {
        Element::new(
            id,
            ElementKind::FreeText(FreeText {
                text: DEFAULT_FREE_TEXT.to_owned(),
                pos: Pos2::new(0.5, 0.5),
                scale: DEFAULT_FREE_TEXT_SCALE,
            }),
        )
    }

    pub fn create_sticker(id: ElementId, bitmap: Bitmap) -> Element {
        Element::new(
            id,
            ElementKind::Sticker(Sticker {
                bitmap,
                pos: Pos2::new(0.5, 0.5),
                scale: DEFAULT_STICKER_SCALE,
            }),
        )
    }
}
