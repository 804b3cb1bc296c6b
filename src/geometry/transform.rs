//! Pan/zoom math for the base image and pointer-to-canvas mapping.

use egui::{Pos2, Rect, Vec2};

use crate::input::PointerInput;

/// Scale that makes an image of `natural` size cover the whole `frame`.
pub fn fit_cover(natural: Vec2, frame: Vec2) -> f32 {
    (frame.x / natural.x).max(frame.y / natural.y)
}

/// Clamp the image origin so that the drawn image leaves no gap at the frame
/// edges. An axis that is smaller than the frame is centered instead.
pub fn clamp_image_pan(origin: Pos2, drawn: Vec2, frame: Vec2) -> Pos2 {
    Pos2::new(
        clamp_axis(origin.x, drawn.x, frame.x),
        clamp_axis(origin.y, drawn.y, frame.y),
    )
}

fn clamp_axis(origin: f32, drawn: f32, frame: f32) -> f32 {
    if drawn < frame {
        (frame - drawn) / 2.0
    } else {
        origin.clamp(frame - drawn, 0.0)
    }
}

/// Re-scale the image while keeping the image point under `frame_center`
/// in place. The caller still has to clamp the result.
pub fn apply_zoom_around_center(
    old_scale: f32,
    new_scale: f32,
    origin: Pos2,
    frame_center: Pos2,
) -> Pos2 {
    // Image-space point currently under the center
    let anchor = (frame_center - origin) / old_scale;
    frame_center - anchor * new_scale
}

/// Map a device pointer into canvas pixels, correcting for the on-screen
/// scaling of the canvas widget.
pub fn pointer_to_canvas_pixels(
    pointer: &PointerInput,
    element_rect: Rect,
    canvas_pixel_size: Vec2,
) -> Option<Pos2> {
    let client = pointer.primary_position()?;
    let scale = canvas_pixel_size / element_rect.size();
    Some(Pos2::new(
        (client.x - element_rect.min.x) * scale.x,
        (client.y - element_rect.min.y) * scale.y,
    ))
}

/// Inverse of [`pointer_to_canvas_pixels`]
pub fn canvas_pixels_to_pointer(pixel: Pos2, element_rect: Rect, canvas_pixel_size: Vec2) -> Pos2 {
    let scale = element_rect.size() / canvas_pixel_size;
    Pos2::new(
        element_rect.min.x + pixel.x * scale.x,
        element_rect.min.y + pixel.y * scale.y,
    )
}

/// Normalized element coordinates to canvas pixels
pub fn to_pixels(normalized: Pos2, frame: Vec2) -> Pos2 {
    Pos2::new(normalized.x * frame.x, normalized.y * frame.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    const FRAME: Vec2 = vec2(540.0, 960.0);

    #[test]
    fn test_fit_cover_landscape_scenario() {
        let scale = fit_cover(vec2(800.0, 600.0), FRAME);
        assert!((scale - 1.6).abs() < 1e-6);

        let drawn = vec2(800.0, 600.0) * scale;
        assert!((drawn.x - 1280.0).abs() < 1e-3);
        assert!((drawn.y - 960.0).abs() < 1e-3);

        let centered = pos2((FRAME.x - drawn.x) / 2.0, (FRAME.y - drawn.y) / 2.0);
        let origin = clamp_image_pan(centered, drawn, FRAME);
        assert!((origin.x - -370.0).abs() < 1e-3);
        assert!(origin.y.abs() < 1e-3);
    }

    #[test]
    fn test_cover_invariant_over_many_sizes() {
        for w in [1.0, 13.0, 200.0, 540.0, 799.0, 4000.0] {
            for h in [1.0, 7.0, 300.0, 960.0, 1234.0, 6000.0] {
                let scale = fit_cover(vec2(w, h), FRAME);
                let drawn = vec2(w, h) * scale;
                let origin = clamp_image_pan(pos2(1000.0, -5000.0), drawn, FRAME);
                // Either covering with no gap, or centered on float slack
                assert!(drawn.x >= FRAME.x - 1e-3 && drawn.y >= FRAME.y - 1e-3);
                assert!(origin.x <= 1e-3 && origin.x + drawn.x >= FRAME.x - 1e-3);
                assert!(origin.y <= 1e-3 && origin.y + drawn.y >= FRAME.y - 1e-3);
            }
        }
    }

    #[test]
    fn test_clamp_keeps_edges_covered() {
        let drawn = vec2(1280.0, 960.0);
        assert_eq!(clamp_image_pan(pos2(50.0, 10.0), drawn, FRAME), pos2(0.0, 0.0));
        assert_eq!(clamp_image_pan(pos2(-2000.0, 0.0), drawn, FRAME), pos2(-740.0, 0.0));
    }

    #[test]
    fn test_undersized_axis_is_centered() {
        let origin = clamp_image_pan(pos2(-30.0, -30.0), vec2(539.0, 2000.0), FRAME);
        assert_eq!(origin.x, 0.5);
        assert_eq!(origin.y, -30.0);
    }

    #[test]
    fn test_zoom_keeps_center_point() {
        let origin = pos2(-370.0, 0.0);
        let center = pos2(270.0, 480.0);
        let new_origin = apply_zoom_around_center(1.6, 3.2, origin, center);

        let before = (center - origin) / 1.6;
        let after = (center - new_origin) / 3.2;
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn test_pointer_mapping_corrects_css_scale() {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(270.0, 480.0));
        let pointer = PointerInput::Mouse(pos2(235.0, 290.0));
        let px = pointer_to_canvas_pixels(&pointer, rect, FRAME).unwrap();
        assert_eq!(px, pos2(270.0, 480.0));
    }

    #[test]
    fn test_pointer_mapping_uses_first_touch() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(540.0, 960.0));
        let pointer = PointerInput::Touch(vec![pos2(10.0, 20.0), pos2(300.0, 300.0)]);
        assert_eq!(pointer_to_canvas_pixels(&pointer, rect, FRAME), Some(pos2(10.0, 20.0)));
        assert_eq!(pointer_to_canvas_pixels(&PointerInput::Touch(vec![]), rect, FRAME), None);
    }

    #[test]
    fn test_pointer_round_trip() {
        let rect = Rect::from_min_size(pos2(17.0, 33.0), vec2(303.0, 538.0));
        for (x, y) in [(17.0, 33.0), (100.5, 200.25), (319.0, 570.0)] {
            let pointer = PointerInput::Mouse(pos2(x, y));
            let px = pointer_to_canvas_pixels(&pointer, rect, FRAME).unwrap();
            let back = canvas_pixels_to_pointer(px, rect, FRAME);
            assert!((back - pos2(x, y)).length() < 1e-3);
            assert!(px.x >= 0.0 && px.x <= FRAME.x + 1e-3);
        }
    }
}
