use std::path::{Path, PathBuf};

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::editor::Editor;
use crate::element::Bitmap;
use crate::error::Result;

/// What a dropped or opened image becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropMode {
    /// Replace the base photo
    #[default]
    Photo,
    /// Add a sticker element
    Sticker,
}

impl DropMode {
    pub fn command(self, bitmap: Bitmap) -> Command {
        match self {
            DropMode::Photo => Command::LoadImage(bitmap),
            DropMode::Sticker => Command::AddSticker(bitmap),
        }
    }
}

/// Turns files dropped on the window or typed paths into commands
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if there is anything to process.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
            }
        });
        !self.dropped_files.is_empty()
    }

    /// Decode the queued files into commands for `mode`
    pub fn process_dropped_files(&mut self, mode: DropMode) -> Vec<Command> {
        let mut commands = Vec::new();
        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = match &file.path {
                Some(path) => path.display().to_string(),
                None if !file.name.is_empty() => file.name.clone(),
                None => "unknown".to_owned(),
            };

            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {file_name}");
                continue;
            }

            let decoded = if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                Bitmap::decode(bytes)
            } else if let Some(path) = &file.path {
                load_bitmap(path)
            } else {
                log::warn!("Dropped file has no accessible data: {file_name}");
                continue;
            };

            match decoded {
                Ok(bitmap) => commands.push(mode.command(bitmap)),
                Err(err) => log::error!("Failed to load {file_name}: {err}"),
            }
        }
        commands
    }

    /// Dim the window while files hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context, mode: DropMode) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = match mode {
            DropMode::Photo => "Drop to replace the photo",
            DropMode::Sticker => "Drop to add a sticker",
        };
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(22.0),
            Color32::WHITE,
        );
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(path) = &file.path {
        has_image_extension(path)
    } else {
        has_image_extension(Path::new(&file.name))
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

pub fn load_bitmap(path: &Path) -> Result<Bitmap> {
    log::info!("Processing image from path: {}", path.display());
    Bitmap::decode(&std::fs::read(path)?)
}

pub fn export_file_name(timestamp: u64) -> String {
    format!("fried_{timestamp}.jpg")
}

/// Write the current frame as `fried_<timestamp>.jpg` into `dir`
pub fn export_frame(editor: &Editor, dir: &Path, timestamp: u64) -> Result<PathBuf> {
    let bytes = editor.export_jpeg()?;
    let path = dir.join(export_file_name(timestamp));
    std::fs::write(&path, bytes)?;
    log::info!("💾 Exported {}", path.display());
    Ok(path)
}
