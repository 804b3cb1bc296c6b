use egui::{Pos2, Rect, Vec2};
use tiny_skia::Color;

use crate::canvas::{Canvas, Shadow};
use crate::config::FryConfig;
use crate::element::{Element, ElementKind};
use crate::geometry::{compute_element_rect, handle_center, to_pixels};
use crate::scene::Scene;
use crate::text::{self, ClusterKind, FontFace, GlyphCache};

const PLACEHOLDER_FILL: [u8; 4] = [0x12, 0x12, 0x12, 255];
const PLACEHOLDER_TITLE: [u8; 4] = [0x33, 0x33, 0x40, 255];
const PLACEHOLDER_HINT: [u8; 4] = [0x66, 0x66, 0x66, 255];
const BAND_FILL: [u8; 4] = [0, 0, 0, 128];
const TEXT_SHADOW: [u8; 4] = [0, 0, 0, 204];
const SELECTION_OUTLINE: [u8; 4] = [255, 255, 255, 230];
const HANDLE_RING: [u8; 4] = [138, 43, 226, 255];

fn rgba([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

/// Draws the scene onto a [`Canvas`].
///
/// Owns the text font and the emoji glyph cache so that layout, drawing and
/// hit-testing all measure text the same way.
pub struct Renderer {
    config: FryConfig,
    font: FontFace,
    glyphs: GlyphCache,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("font", &self.font).finish()
    }
}

impl Renderer {
    pub fn new(config: FryConfig, font: FontFace, glyphs: GlyphCache) -> Self {
        Self { config, font, glyphs }
    }

    pub fn config(&self) -> &FryConfig {
        &self.config
    }

    pub fn font(&self) -> &FontFace {
        &self.font
    }

    /// Returns true when an emoji glyph became drawable since the last call
    pub fn poll_glyphs(&mut self) -> bool {
        self.glyphs.poll()
    }

    pub fn has_pending_glyphs(&self) -> bool {
        self.glyphs.has_pending()
    }

    /// Base image, or the placeholder card when none is loaded
    pub fn draw_base(&mut self, canvas: &mut Canvas, scene: &Scene) {
        canvas.clear();
        match scene.image() {
            Some(image) => canvas.draw_bitmap(&image.bitmap, image.placement.rect()),
            None => self.draw_placeholder(canvas),
        }
    }

    fn draw_placeholder(&mut self, canvas: &mut Canvas) {
        canvas.fill(rgba(PLACEHOLDER_FILL));
        let center = Pos2::new(canvas.size().x / 2.0, canvas.size().y / 2.0);
        self.draw_text(canvas, "Preview 9:16", center, 24.0, rgba(PLACEHOLDER_TITLE));
        self.draw_text(
            canvas,
            "Load an image",
            center + Vec2::new(0.0, 30.0),
            16.0,
            rgba(PLACEHOLDER_HINT),
        );
    }

    /// Centered multi-line text with inline emoji glyphs. Emoji whose bitmap
    /// is not available yet are drawn through the font.
    fn draw_text(&mut self, canvas: &mut Canvas, content: &str, center: Pos2, font_size: f32, color: Color) {
        let block = text::layout(content, font_size, &self.font);
        for placed in block.place(center) {
            let mut x = placed.left;
            for cluster in &placed.line.clusters {
                let glyph = match &cluster.kind {
                    ClusterKind::Emoji(key) => self.glyphs.get(key),
                    ClusterKind::Text => None,
                };
                match glyph {
                    Some(bitmap) => {
                        let size = cluster.width;
                        let dest = Rect::from_min_size(
                            Pos2::new(x, placed.middle_y - size / 2.0),
                            Vec2::splat(size),
                        );
                        canvas.draw_bitmap(&bitmap, dest);
                    }
                    None => canvas.fill_text(
                        &self.font,
                        &cluster.text,
                        x,
                        placed.middle_y,
                        font_size,
                        color,
                    ),
                }
                x += cluster.width;
            }
        }
    }

    pub fn draw_element(&mut self, canvas: &mut Canvas, element: &Element) {
        canvas.save();
        match &element.kind {
            ElementKind::Sticker(sticker) => {
                if let Some(rect) = compute_element_rect(element, &self.config, &self.font) {
                    canvas.draw_bitmap(&sticker.bitmap, rect);
                }
            }
            ElementKind::FreeText(free) => {
                if !free.text.is_empty() {
                    canvas.set_shadow(Some(Shadow {
                        color: rgba(TEXT_SHADOW),
                        offset: Vec2::splat(2.0),
                    }));
                    let center = to_pixels(free.pos, self.config.frame_size());
                    let font_size = self.config.free_text_font_size * free.scale;
                    self.draw_text(canvas, &free.text, center, font_size, Color::WHITE);
                }
            }
            ElementKind::Band(band) => {
                if let Some(rect) = compute_element_rect(element, &self.config, &self.font) {
                    canvas.fill_rect(rect, rgba(BAND_FILL));
                    if !band.text.is_empty() {
                        let font_size = self.config.band_font_size();
                        self.draw_text(canvas, &band.text, rect.center(), font_size, Color::WHITE);
                    }
                }
            }
        }
        canvas.restore();
    }

    /// Every element in z-order, without selection decoration
    pub fn draw_elements(&mut self, canvas: &mut Canvas, scene: &Scene) {
        for element in scene.elements() {
            self.draw_element(canvas, element);
        }
    }

    fn draw_selection(&mut self, canvas: &mut Canvas, scene: &Scene) {
        let Some(element) = scene.selected_element() else {
            return;
        };
        let Some(rect) = compute_element_rect(element, &self.config, &self.font) else {
            return;
        };
        canvas.stroke_dashed_rect(rect, rgba(SELECTION_OUTLINE), 2.0);
        if let Some(center) = handle_center(element, &self.config, &self.font) {
            let radius = self.config.handle_draw_radius;
            canvas.fill_circle(center, radius, Color::WHITE);
            canvas.stroke_circle(center, radius, rgba(HANDLE_RING), 2.0);
        }
    }

    /// The synchronous clean pass: base, elements, selection decoration
    pub fn render_clean(&mut self, canvas: &mut Canvas, scene: &Scene) {
        self.draw_base(canvas, scene);
        self.draw_elements(canvas, scene);
        self.draw_selection(canvas, scene);
    }
}

#[cfg(test)]
pub(crate) fn test_renderer(config: FryConfig) -> Renderer {
    use crate::text::{FetchMode, NoGlyphSource};
    use std::sync::Arc;

    let font = FontFace::bundled().unwrap();
    let glyphs = GlyphCache::new(Arc::new(NoGlyphSource), FetchMode::Inline);
    Renderer::new(config, font, glyphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::image::solid_bitmap;

    fn setup() -> (Renderer, Canvas, Scene) {
        let config = FryConfig::default();
        let canvas = Canvas::new(config.frame_width, config.frame_height).unwrap();
        let scene = Scene::new(&config);
        (test_renderer(config), canvas, scene)
    }

    #[test]
    fn test_placeholder_without_image() {
        let (mut renderer, mut canvas, scene) = setup();
        renderer.render_clean(&mut canvas, &scene);
        assert_eq!(canvas.pixel(5, 5), Some([0x12, 0x12, 0x12, 255]));
    }

    #[test]
    fn test_image_covers_frame() {
        let (mut renderer, mut canvas, mut scene) = setup();
        scene.load_image(solid_bitmap(80, 60, [0, 200, 0, 255]));
        renderer.render_clean(&mut canvas, &scene);
        for (x, y) in [(0, 0), (539, 959), (270, 480)] {
            let [r, g, b, a] = canvas.pixel(x, y).unwrap();
            assert_eq!((r, b, a), (0, 0, 255));
            assert!(g.abs_diff(200) <= 1);
        }
    }

    #[test]
    fn test_clean_render_is_idempotent() {
        let (mut renderer, mut canvas, mut scene) = setup();
        scene.load_image(solid_bitmap(80, 60, [30, 60, 90, 255]));
        scene.add_band();
        scene.update_text(scene.selected().unwrap(), "Hello 😀");
        scene.add_free_text();

        renderer.render_clean(&mut canvas, &scene);
        let first = canvas.data().to_vec();
        renderer.render_clean(&mut canvas, &scene);
        assert_eq!(first, canvas.data());
    }

    #[test]
    fn test_band_darkens_its_strip() {
        let (mut renderer, mut canvas, mut scene) = setup();
        scene.load_image(solid_bitmap(10, 10, [200, 200, 200, 255]));
        let band = scene.add_band();
        scene.set_position(band, Pos2::new(0.5, 0.0));
        scene.select(None);
        renderer.render_clean(&mut canvas, &scene);

        // Strip covers y in [0, 48)
        let [r, ..] = canvas.pixel(2, 10).unwrap();
        assert!((95..=105).contains(&r), "r={r}");
        assert_eq!(canvas.pixel(2, 100), Some([200, 200, 200, 255]));
    }

    #[test]
    fn test_selection_draws_handle() {
        let (mut renderer, mut canvas, mut scene) = setup();
        scene.load_image(solid_bitmap(10, 10, [0, 0, 0, 255]));
        let sticker = scene.add_sticker(solid_bitmap(10, 10, [0, 0, 0, 255]));
        renderer.render_clean(&mut canvas, &scene);

        let corner = handle_center(scene.element(sticker).unwrap(), renderer.config(), renderer.font())
            .unwrap();
        let [r, g, b, _] = canvas.pixel(corner.x as u32, corner.y as u32).unwrap();
        assert!(r > 200 && g > 200 && b > 200);
    }
}
