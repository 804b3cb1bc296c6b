//! The compositing scene: base image, overlay elements and effect levels.

use egui::{Pos2, Rect, Vec2};
use log::{debug, info};

use crate::config::FryConfig;
use crate::element::{factory, Bitmap, Element};
use crate::geometry::{apply_zoom_around_center, clamp_image_pan, fit_cover};
use crate::id_generator::{ElementId, IdGenerator};

pub const MAX_FRY_LEVEL: u32 = 30;
pub const MAX_TINT_LEVEL: u8 = 100;
pub const DEFAULT_FRY_LEVEL: u32 = 10;
pub const DEFAULT_TINT_LEVEL: u8 = 20;
pub const MIN_ZOOM: f32 = 1.0;

/// Where the base image is drawn inside the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub natural: Vec2,
    /// Top-left corner in canvas pixels
    pub origin: Pos2,
    /// Cover-fit scale, fixed per loaded image
    pub base_scale: f32,
    pub zoom: f32,
}

impl ImagePlacement {
    pub fn scale(&self) -> f32 {
        self.base_scale * self.zoom
    }

    pub fn drawn_size(&self) -> Vec2 {
        self.natural * self.scale()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin, self.drawn_size())
    }
}

#[derive(Debug, Clone)]
pub struct BaseImage {
    pub bitmap: Bitmap,
    pub placement: ImagePlacement,
}

#[derive(Debug, Clone)]
pub struct Scene {
    frame: Vec2,
    max_zoom: f32,
    image: Option<BaseImage>,
    elements: Vec<Element>,
    fry_level: u32,
    tint_level: u8,
    selected: Option<ElementId>,
    ids: IdGenerator,
}

impl Scene {
    pub fn new(config: &FryConfig) -> Self {
        Self {
            frame: config.frame_size(),
            max_zoom: config.max_zoom.max(MIN_ZOOM),
            image: None,
            elements: Vec::new(),
            fry_level: DEFAULT_FRY_LEVEL,
            tint_level: DEFAULT_TINT_LEVEL,
            selected: None,
            ids: IdGenerator::default(),
        }
    }

    pub fn frame(&self) -> Vec2 {
        self.frame
    }

    pub fn image(&self) -> Option<&BaseImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Elements in z-order, bottom first
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.element(id))
    }

    /// Select an existing element, or clear the selection with `None`
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| self.element(*id).is_some());
    }

    pub fn fry_level(&self) -> u32 {
        self.fry_level
    }

    pub fn tint_level(&self) -> u8 {
        self.tint_level
    }

    fn push(&mut self, element: Element) -> ElementId {
        let id = element.id();
        debug!("Adding {} element {id}", element.element_type());
        self.elements.push(element);
        self.selected = Some(id);
        id
    }

    pub fn add_band(&mut self) -> ElementId {
        let id = self.ids.generate();
        self.push(factory::create_band(id))
    }

    pub fn add_free_text(&mut self) -> ElementId {
        let id = self.ids.generate();
        self.push(factory::create_free_text(id))
    }

    pub fn add_sticker(&mut self, bitmap: Bitmap) -> ElementId {
        let id = self.ids.generate();
        self.push(factory::create_sticker(id, bitmap))
    }

    /// Returns false when no element has `id`
    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id() != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        before != self.elements.len()
    }

    pub fn update_text(&mut self, id: ElementId, text: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.set_text(text))
    }

    pub fn update_fry_score(&mut self, id: ElementId, score: f64) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.set_fry_score(score);
                true
            }
            None => false,
        }
    }

    pub fn update_scale(&mut self, id: ElementId, scale: f32) -> bool {
        self.element_mut(id).is_some_and(|e| e.set_scale(scale))
    }

    pub fn set_position(&mut self, id: ElementId, pos: Pos2) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.set_position(pos);
                true
            }
            None => false,
        }
    }

    pub fn set_fry_level(&mut self, level: u32) {
        self.fry_level = level.min(MAX_FRY_LEVEL);
    }

    pub fn set_tint_level(&mut self, level: u8) {
        self.tint_level = level.min(MAX_TINT_LEVEL);
    }

    /// Replace the base image: cover the frame, centered, zoom reset.
    pub fn load_image(&mut self, bitmap: Bitmap) {
        let natural = bitmap.size();
        let base_scale = fit_cover(natural, self.frame);
        let drawn = natural * base_scale;
        let centered = Pos2::new((self.frame.x - drawn.x) / 2.0, (self.frame.y - drawn.y) / 2.0);
        let placement = ImagePlacement {
            natural,
            origin: clamp_image_pan(centered, drawn, self.frame),
            base_scale,
            zoom: MIN_ZOOM,
        };
        info!(
            "📷 Base image {}x{} at scale {:.3}",
            natural.x, natural.y, base_scale
        );
        self.image = Some(BaseImage { bitmap, placement });
    }

    pub fn zoom(&self) -> f32 {
        self.image
            .as_ref()
            .map_or(MIN_ZOOM, |image| image.placement.zoom)
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Zoom around the frame center. Returns false without an image.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let frame = self.frame;
        let zoom = if zoom.is_nan() {
            MIN_ZOOM
        } else {
            zoom.clamp(MIN_ZOOM, self.max_zoom)
        };
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        let placement = &mut image.placement;
        let old_scale = placement.scale();
        placement.zoom = zoom;
        let center = Pos2::new(frame.x / 2.0, frame.y / 2.0);
        let origin = apply_zoom_around_center(old_scale, placement.scale(), placement.origin, center);
        placement.origin = clamp_image_pan(origin, placement.drawn_size(), frame);
        true
    }

    /// Move the image's top-left corner, kept within the covering range
    pub fn pan_image_to(&mut self, origin: Pos2) -> bool {
        let frame = self.frame;
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        let placement = &mut image.placement;
        placement.origin = clamp_image_pan(origin, placement.drawn_size(), frame);
        true
    }
}
