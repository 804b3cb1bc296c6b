//! CPU drawing surface backing the preview frame.

use egui::{Pos2, Rect, Vec2};
use image::RgbImage;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint,
    PremultipliedColorU8, Stroke, StrokeDash, Transform,
};

use crate::element::Bitmap;
use crate::error::{FryError, Result};
use crate::text::FontFace;

/// Offset drop shadow applied to text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DrawState {
    shadow: Option<Shadow>,
}

/// Fixed-size raster surface with a save/restore stack of draw state
pub struct Canvas {
    pixmap: Pixmap,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("depth", &self.saved.len())
            .finish()
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(FryError::InvalidFrame { width, height })?;
        Ok(Self {
            pixmap,
            state: DrawState::default(),
            saved: Vec::new(),
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

    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    /// Reset every pixel to transparent black
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Blend `color` over the whole surface
    pub fn fill(&mut self, color: Color) {
        let rect = Rect::from_min_size(Pos2::ZERO, self.size());
        self.fill_rect(rect, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint_for(color), Transform::identity(), None);
    }

    /// Draw `bitmap` stretched into `dest`
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect) {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let sx = dest.width() / bitmap.width() as f32;
        let sy = dest.height() / bitmap.height() as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest.min.x, dest.min.y);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, bitmap.pixmap().as_ref(), &paint, transform, None);
    }

    pub fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width,
            dash: StrokeDash::new(vec![6.0, 4.0], 0.0),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }

    pub fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn stroke_circle(&mut self, center: Pos2, radius: f32, color: Color, width: f32) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
        }
    }

    /// Left-aligned, middle-baseline text. Draws the current shadow first.
    pub fn fill_text(
        &mut self,
        font: &FontFace,
        text: &str,
        left: f32,
        middle_y: f32,
        font_size: f32,
        color: Color,
    ) {
        if let Some(shadow) = self.state.shadow {
            font.rasterize(
                text,
                left + shadow.offset.x,
                middle_y + shadow.offset.y,
                font_size,
                |x, y, coverage| self.blend_pixel(x, y, shadow.color, coverage),
            );
        }
        font.rasterize(text, left, middle_y, font_size, |x, y, coverage| {
            self.blend_pixel(x, y, color, coverage)
        });
    }

    // Source-over of `color` scaled by `coverage` onto one pixel
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let (width, height) = (self.width() as i32, self.height() as i32);
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        let alpha = color.alpha() * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let index = (y * width + x) as usize;
        let dst = self.pixmap.pixels()[index];
        let inverse = 1.0 - alpha;
        let channel = |src: f32, dst: u8| (src * alpha * 255.0 + dst as f32 * inverse).round();

        let a = (alpha * 255.0 + dst.alpha() as f32 * inverse).round().min(255.0) as u8;
        let r = channel(color.red(), dst.red()).min(a as f32) as u8;
        let g = channel(color.green(), dst.green()).min(a as f32) as u8;
        let b = channel(color.blue(), dst.blue()).min(a as f32) as u8;

        if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, a) {
            self.pixmap.pixels_mut()[index] = blended;
        }
    }

    /// RGB view of the frame composited over black
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut rgb = Vec::with_capacity(self.pixmap.pixels().len() * 3);
        for px in self.pixmap.pixels() {
            rgb.extend_from_slice(&[px.red(), px.green(), px.blue()]);
        }
        // Buffer length always matches the dimensions
        RgbImage::from_raw(self.width(), self.height(), rgb)
            .unwrap_or_else(|| RgbImage::new(self.width(), self.height()))
    }

    /// Overwrite the frame with opaque pixels from `image`, drawn at the
    /// top-left corner.
    pub fn replace_with(&mut self, image: &RgbImage) {
        let width = self.width();
        for (x, y, px) in image.enumerate_pixels() {
            if x >= width || y >= self.height() {
                continue;
            }
            let [r, g, b] = px.0;
            self.pixmap.pixels_mut()[(y * width + x) as usize] =
                ColorU8::from_rgba(r, g, b, 255).premultiply();
        }
    }

    /// Premultiplied RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?;
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }

    /// Raw premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_premultiplied(
            [self.width() as usize, self.height() as usize],
            self.data(),
        )
    }
}
