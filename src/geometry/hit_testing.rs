use egui::{Pos2, Rect, Vec2};

use super::transform::to_pixels;
use crate::config::FryConfig;
use crate::element::{Element, ElementKind};
use crate::id_generator::ElementId;
use crate::text::{self, TextMeasure};

/// Canvas-pixel box of `element` used for hit-testing and the selection
/// outline. Free text without any characters has no box.
pub fn compute_element_rect(
    element: &Element,
    config: &FryConfig,
    measure: &dyn TextMeasure,
) -> Option<Rect> {
    let frame = config.frame_size();
    match &element.kind {
        ElementKind::Band(band) => {
            let band_height = config.band_height();
            let y_pos = band.y * (frame.y - band_height);
            Some(Rect::from_min_size(
                Pos2::new(0.0, y_pos),
                Vec2::new(frame.x, band_height),
            ))
        }
        ElementKind::FreeText(free) => {
            if free.text.is_empty() {
                return None;
            }
            let block = text::layout(&free.text, config.free_text_font_size * free.scale, measure);
            let center = to_pixels(free.pos, frame);
            Some(
                Rect::from_center_size(center, Vec2::new(block.width, block.height))
                    .expand(config.hit_padding),
            )
        }
        ElementKind::Sticker(sticker) => {
            let width = frame.x * sticker.scale;
            let height = width * sticker.bitmap.aspect();
            let center = to_pixels(sticker.pos, frame);
            Some(Rect::from_center_size(center, Vec2::new(width, height)))
        }
    }
}

/// Bottom-right corner of the element box; bands cannot be resized.
pub fn handle_center(element: &Element, config: &FryConfig, measure: &dyn TextMeasure) -> Option<Pos2> {
    if element.is_band() {
        return None;
    }
    compute_element_rect(element, config, measure).map(|rect| rect.right_bottom())
}

pub fn is_point_near_handle(
    pos: Pos2,
    element: &Element,
    config: &FryConfig,
    measure: &dyn TextMeasure,
) -> bool {
    handle_center(element, config, measure)
        .is_some_and(|corner| pos.distance(corner) <= config.handle_radius)
}

/// Top-most element whose box contains `pos`
pub fn hit_test(
    elements: &[Element],
    pos: Pos2,
    config: &FryConfig,
    measure: &dyn TextMeasure,
) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|element| {
            compute_element_rect(element, config, measure).is_some_and(|rect| rect.contains(pos))
        })
        .map(Element::id)
}
