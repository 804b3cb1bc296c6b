//! Lossy re-encode of the frame and the color filters applied after it.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::canvas::Canvas;
use crate::error::{FryError, Result};

// Rec. 709 luma weights used by the CSS saturate() matrix
const LUMA: [f32; 3] = [0.213, 0.715, 0.072];

fn encode_rgb(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(image)
        .map_err(|e| FryError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Encode the current frame as JPEG for export
pub fn encode_jpeg(canvas: &Canvas, quality: u8) -> Result<Vec<u8>> {
    encode_rgb(&canvas.to_rgb_image(), quality)
}

/// One degradation step: JPEG round trip at `quality`, then contrast and
/// saturation applied in that order. The frame becomes fully opaque.
pub fn degrade_frame(canvas: &mut Canvas, quality: u8, contrast: f32, saturation: f32) -> Result<()> {
    let bytes = encode_jpeg(canvas, quality)?;
    let mut decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?.to_rgb8();
    for px in decoded.pixels_mut() {
        px.0 = filter_pixel(px.0, contrast, saturation);
    }
    canvas.replace_with(&decoded);
    Ok(())
}

pub fn contrast(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    rgb.map(|v| ((v - 0.5) * amount + 0.5).clamp(0.0, 1.0))
}

pub fn saturate(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    let [r, g, b] = rgb;
    let [lr, lg, lb] = LUMA;
    let keep = 1.0 - amount;
    [
        (lr + (1.0 - lr) * amount) * r + lg * keep * g + lb * keep * b,
        lr * keep * r + (lg + (1.0 - lg) * amount) * g + lb * keep * b,
        lr * keep * r + lg * keep * g + (lb + (1.0 - lb) * amount) * b,
    ]
    .map(|v| v.clamp(0.0, 1.0))
}

fn filter_pixel(px: [u8; 3], contrast_amount: f32, saturation: f32) -> [u8; 3] {
    let rgb = px.map(|v| v as f32 / 255.0);
    saturate(contrast(rgb, contrast_amount), saturation).map(|v| (v * 255.0).round() as u8)
}
