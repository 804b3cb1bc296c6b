pub mod hit_testing;
pub mod transform;

pub use hit_testing::{compute_element_rect, handle_center, hit_test, is_point_near_handle};
pub use transform::{
    apply_zoom_around_center, canvas_pixels_to_pointer, clamp_image_pan, fit_cover,
    pointer_to_canvas_pixels, to_pixels,
};
