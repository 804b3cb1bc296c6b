use log::debug;

use crate::element::Bitmap;
use crate::id_generator::ElementId;
use crate::scene::Scene;

/// User edits issued by the UI and applied to the [`Scene`]
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the base image
    LoadImage(Bitmap),
    /// Zoom factor, 1.0 = cover fit
    SetZoom(f32),
    AddBand,
    AddFreeText,
    AddSticker(Bitmap),
    Remove(ElementId),
    UpdateText {
        id: ElementId,
        text: String,
    },
    UpdateFryScore {
        id: ElementId,
        score: f64,
    },
    UpdateScale {
        id: ElementId,
        scale: f32,
    },
    SetFryLevel(u32),
    SetTintLevel(u8),
    Select(Option<ElementId>),
}

impl Command {
    /// Apply the command. Returns false when it had nothing to act on.
    pub fn execute(self, scene: &mut Scene) -> bool {
        debug!("Executing {}", self.name());
        match self {
            Command::LoadImage(bitmap) => {
                scene.load_image(bitmap);
                true
            }
            Command::SetZoom(zoom) => scene.set_zoom(zoom),
            Command::AddBand => {
                scene.add_band();
                true
            }
            Command::AddFreeText => {
                scene.add_free_text();
                true
            }
            Command::AddSticker(bitmap) => {
                scene.add_sticker(bitmap);
                true
            }
            Command::Remove(id) => scene.remove(id),
            Command::UpdateText { id, text } => scene.update_text(id, &text),
            Command::UpdateFryScore { id, score } => scene.update_fry_score(id, score),
            Command::UpdateScale { id, scale } => scene.update_scale(id, scale),
            Command::SetFryLevel(level) => {
                scene.set_fry_level(level);
                true
            }
            Command::SetTintLevel(level) => {
                scene.set_tint_level(level);
                true
            }
            Command::Select(id) => {
                scene.select(id);
                true
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadImage(_) => "LoadImage",
            Command::SetZoom(_) => "SetZoom",
            Command::AddBand => "AddBand",
            Command::AddFreeText => "AddFreeText",
            Command::AddSticker(_) => "AddSticker",
            Command::Remove(_) => "Remove",
            Command::UpdateText { .. } => "UpdateText",
            Command::UpdateFryScore { .. } => "UpdateFryScore",
            Command::UpdateScale { .. } => "UpdateScale",
            Command::SetFryLevel(_) => "SetFryLevel",
            Command::SetTintLevel(_) => "SetTintLevel",
            Command::Select(_) => "Select",
        }
    }
}
