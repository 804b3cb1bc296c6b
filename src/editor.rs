use std::sync::Arc;

use egui::Pos2;
use log::{debug, info};

use crate::canvas::Canvas;
use crate::codec;
use crate::command::Command;
use crate::config::FryConfig;
use crate::error::Result;
use crate::fry::FryScheduler;
use crate::interaction::{Interaction, PointerResponse};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::text::{DirGlyphSource, FetchMode, FontFace, GlyphCache, GlyphSource, NoGlyphSource};

/// Application state of the studio.
///
/// Owns the scene, the drawing surface, the renderer, the interaction state
/// machine and the degradation scheduler, and routes UI commands and pointer
/// events between them. Time is passed in explicitly as seconds.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    canvas: Canvas,
    renderer: Renderer,
    interaction: Interaction,
    scheduler: FryScheduler,
    frame_dirty: bool,
    /// A press redrew the clean frame, so the release must re-fry it
    refry_on_release: bool,
}

impl Editor {
    /// Load the configured font and emoji directory
    pub fn new(config: FryConfig) -> Result<Self> {
        let font = FontFace::from_config(&config)?;
        let source: Arc<dyn GlyphSource> = match &config.emoji_dir {
            Some(dir) => {
                info!("Emoji glyphs from {}", dir.display());
                Arc::new(DirGlyphSource::new(dir))
            }
            None => Arc::new(NoGlyphSource),
        };
        Self::with_parts(config, font, GlyphCache::new(source, FetchMode::Background))
    }

    pub fn with_parts(config: FryConfig, font: FontFace, glyphs: GlyphCache) -> Result<Self> {
        let canvas = Canvas::new(config.frame_width, config.frame_height)?;
        let scene = Scene::new(&config);
        let scheduler = FryScheduler::new(config.debounce_secs);
        let mut editor = Self {
            scene,
            canvas,
            renderer: Renderer::new(config, font, glyphs),
            interaction: Interaction::new(),
            scheduler,
            frame_dirty: false,
            refry_on_release: false,
        };
        editor.render();
        Ok(editor)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn config(&self) -> &FryConfig {
        self.renderer.config()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Whether a degradation pass is running
    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    /// Whether `tick` still has pending work: a running pass, an armed
    /// debounce or glyphs on the way
    pub fn needs_tick(&self) -> bool {
        self.scheduler.is_busy() || self.scheduler.is_armed() || self.renderer.has_pending_glyphs()
    }

    pub fn time_until_deadline(&self, now: f64) -> Option<f64> {
        self.scheduler.time_until_deadline(now)
    }

    /// Returns true once after every canvas change
    pub fn take_frame_dirty(&mut self) -> bool {
        std::mem::take(&mut self.frame_dirty)
    }

    /// Synchronous clean pass of the current state
    pub fn render(&mut self) {
        self.renderer.render_clean(&mut self.canvas, &self.scene);
        self.frame_dirty = true;
    }

    /// Restore persisted effect levels without scheduling a pass
    pub fn restore_levels(&mut self, fry_level: u32, tint_level: u8) {
        self.scene.set_fry_level(fry_level);
        self.scene.set_tint_level(tint_level);
        self.render();
    }

    /// Apply a UI command, redraw, and restart the degradation debounce.
    /// Selection changes count too: the clean redraw replaces the fried frame.
    pub fn execute(&mut self, command: Command, now: f64) -> bool {
        let changed = command.execute(&mut self.scene);
        if changed {
            self.render();
            self.scheduler.request(now);
        }
        changed
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> PointerResponse {
        let response = self.interaction.pointer_down(
            pos,
            &mut self.scene,
            self.renderer.config(),
            self.renderer.font(),
        );
        if response.needs_render {
            self.render();
            self.refry_on_release = true;
        }
        response
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> PointerResponse {
        let response = self.interaction.pointer_move(
            pos,
            &mut self.scene,
            self.renderer.config(),
            self.renderer.font(),
        );
        if response.needs_render {
            self.render();
        }
        response
    }

    pub fn pointer_up(&mut self, now: f64) -> PointerResponse {
        let response = self.interaction.pointer_up(&self.scene);
        let redrawn = std::mem::take(&mut self.refry_on_release);
        if response.drag_ended || redrawn {
            debug!("Pointer released, scheduling fry pass");
            self.scheduler.request(now);
        }
        response
    }

    /// Per-frame update: pick up arrived glyphs and advance the degradation
    /// pass. Returns true when the canvas changed.
    pub fn tick(&mut self, now: f64) -> bool {
        let mut changed = false;
        if self.renderer.poll_glyphs() {
            // A running pass keeps its frame; the re-armed debounce redoes it
            if !self.scheduler.is_busy() {
                self.render();
                changed = true;
            }
            self.scheduler.request(now);
        }

        let dragging = self.interaction.is_dragging();
        if self.scheduler.tick(
            now,
            &self.scene,
            &mut self.canvas,
            &mut self.renderer,
            dragging,
        ) {
            self.frame_dirty = true;
            changed = true;
        }
        changed
    }

    /// The current frame as JPEG at the export quality
    pub fn export_jpeg(&self) -> Result<Vec<u8>> {
        codec::encode_jpeg(&self.canvas, self.config().export_quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::image::solid_bitmap;

    fn editor() -> Editor {
        let config = FryConfig {
            frame_width: 54,
            frame_height: 96,
            ..FryConfig::default()
        };
        let glyphs = GlyphCache::new(Arc::new(NoGlyphSource), FetchMode::Inline);
        Editor::with_parts(config, FontFace::bundled().unwrap(), glyphs).unwrap()
    }

    #[test]
    fn test_commands_render_and_schedule() {
        let mut editor = editor();
        assert!(editor.take_frame_dirty());
        assert!(!editor.needs_tick());

        editor.execute(Command::LoadImage(solid_bitmap(8, 8, [10, 10, 10, 255])), 0.0);
        assert!(editor.take_frame_dirty());
        assert!(editor.needs_tick());
        let remaining = editor.time_until_deadline(0.1).unwrap();
        assert!((remaining - 0.3).abs() < 1e-9);
    }

    fn run_pending_pass(editor: &mut Editor, mut now: f64) -> f64 {
        while editor.needs_tick() {
            now += 0.1;
            editor.tick(now);
        }
        now
    }

    fn has_outline_pixel(editor: &Editor) -> bool {
        let canvas = editor.canvas();
        (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
            .filter_map(|(x, y)| canvas.pixel(x, y))
            .any(|[r, g, b, _]| r > 200 && g > 200 && b > 200)
    }

    #[test]
    fn test_selecting_after_a_pass_fries_again() {
        let mut editor = editor();
        editor.execute(Command::LoadImage(solid_bitmap(8, 8, [10, 10, 10, 255])), 0.0);
        editor.execute(Command::AddSticker(solid_bitmap(4, 4, [10, 10, 10, 255])), 0.0);
        let sticker = editor.scene().selected().unwrap();
        editor.execute(Command::Select(None), 0.0);
        let now = run_pending_pass(&mut editor, 0.0);
        assert!(!has_outline_pixel(&editor));

        // The clean redraw bakes in the selection outline...
        editor.execute(Command::Select(Some(sticker)), now);
        assert!(editor.take_frame_dirty());
        assert!(has_outline_pixel(&editor));
        assert!(editor.needs_tick());

        // ...and the re-armed pass replaces it with a fried frame
        run_pending_pass(&mut editor, now);
        assert!(!has_outline_pixel(&editor));
    }

    #[test]
    fn test_click_on_empty_frame_fries_on_release() {
        let mut editor = editor();
        editor.execute(Command::AddBand, 0.0);
        let now = run_pending_pass(&mut editor, 0.0);

        // Band selected: clicking empty space clears it without a drag
        let down = editor.pointer_down(Pos2::new(5.0, 5.0));
        assert!(down.needs_render);
        assert!(!editor.interaction().is_dragging());
        let up = editor.pointer_up(now);
        assert!(!up.drag_ended);
        assert!(editor.needs_tick());
    }

    #[test]
    fn test_pass_runs_to_completion() {
        let mut editor = editor();
        editor.execute(Command::AddBand, 0.0);
        let mut now = 0.5;
        assert!(editor.tick(now));
        assert!(editor.is_busy());
        while editor.is_busy() {
            now += 0.016;
            editor.tick(now);
        }
        assert!(!editor.needs_tick());
        assert!(!editor.export_jpeg().unwrap().is_empty());
    }

    #[test]
    fn test_drag_release_schedules_pass() {
        let mut editor = editor();
        editor.execute(Command::LoadImage(solid_bitmap(8, 8, [10, 10, 10, 255])), 0.0);
        // Let the first debounce lapse into a finished pass
        let mut now = 1.0;
        while editor.tick(now) && editor.is_busy() {
            now += 0.016;
        }

        editor.pointer_down(Pos2::new(5.0, 5.0));
        assert!(editor.interaction().is_dragging());
        editor.pointer_move(Pos2::new(8.0, 5.0));
        let up = editor.pointer_up(now);
        assert!(up.drag_ended);
        assert!(editor.needs_tick());
    }
}
