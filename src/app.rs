use eframe::egui;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::FryConfig;
use crate::editor::Editor;
use crate::error::Result;
use crate::file_handler::{DropMode, FileHandler};
use crate::input::InputHandler;
use crate::interaction::CursorHint;
use crate::panels::{central_panel, tools_panel};
use crate::scene::{DEFAULT_FRY_LEVEL, DEFAULT_TINT_LEVEL};

// Poll interval while background glyph fetches are outstanding
const GLYPH_POLL_SECS: f64 = 0.05;

/// Settings restored when restarting the app.
///
/// We derive Deserialize/Serialize so we can persist them on shutdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct FrySettings {
    pub fry_level: u32,
    pub tint_level: u8,
    pub drop_mode: DropMode,
    pub export_dir: String,
}

impl Default for FrySettings {
    fn default() -> Self {
        Self {
            fry_level: DEFAULT_FRY_LEVEL,
            tint_level: DEFAULT_TINT_LEVEL,
            drop_mode: DropMode::Photo,
            export_dir: ".".to_owned(),
        }
    }
}

/// The eframe shell around the [`Editor`]
pub struct FryApp {
    pub(crate) editor: Editor,
    pub(crate) settings: FrySettings,
    pub(crate) input: InputHandler,
    file_handler: FileHandler,
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) cursor: CursorHint,
    pub(crate) photo_path: String,
    pub(crate) sticker_path: String,
    pub(crate) status: Option<String>,
    /// `ctx.input(|i| i.time)` of the current frame
    pub(crate) now: f64,
}

impl FryApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: FryConfig) -> Result<Self> {
        let settings: FrySettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        info!(
            "Starting with fry level {} and tint {}",
            settings.fry_level, settings.tint_level
        );

        let mut editor = Editor::new(config)?;
        editor.restore_levels(settings.fry_level, settings.tint_level);

        Ok(Self {
            editor,
            settings,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            texture: None,
            cursor: CursorHint::Default,
            photo_path: String::new(),
            sticker_path: String::new(),
            status: None,
            now: 0.0,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn execute_command(&mut self, command: Command) {
        match &command {
            Command::SetFryLevel(level) => self.settings.fry_level = *level,
            Command::SetTintLevel(level) => self.settings.tint_level = *level,
            _ => {}
        }
        self.editor.execute(command, self.now);
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub(crate) fn report_error(&mut self, context: &str, err: &crate::error::FryError) {
        error!("{context}: {err}");
        self.set_status(format!("{context}: {err}"));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler
            .preview_files_being_dropped(ctx, self.settings.drop_mode);
        if self.file_handler.check_for_dropped_files(ctx) {
            for command in self.file_handler.process_dropped_files(self.settings.drop_mode) {
                self.execute_command(command);
            }
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        if !self.editor.take_frame_dirty() && self.texture.is_some() {
            return;
        }
        let image = self.editor.canvas().to_color_image();
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("fry_canvas", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if self.editor.is_busy() {
            ctx.request_repaint();
        } else if let Some(secs) = self.editor.time_until_deadline(self.now) {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(secs));
        } else if self.editor.needs_tick() {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(GLYPH_POLL_SECS));
        }
    }
}

impl eframe::App for FryApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.now = ctx.input(|i| i.time);

        self.handle_dropped_files(ctx);
        self.editor.tick(self.now);
        self.upload_frame(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        // Edits from the panels land in the same texture this frame
        self.upload_frame(ctx);
        self.schedule_repaint(ctx);
    }
}
