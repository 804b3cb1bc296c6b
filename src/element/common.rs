use std::ops::RangeInclusive;

// Common constants for all element types
pub const DEFAULT_FRY_SCORE: f64 = 0.5;
pub const FRY_SCORE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

// Free-floating elements may sit slightly outside the frame
pub const LOOSE_X_RANGE: RangeInclusive<f32> = -0.2..=1.2;
pub const LOOSE_Y_RANGE: RangeInclusive<f32> = -0.1..=1.1;
pub const BAND_Y_RANGE: RangeInclusive<f32> = 0.0..=1.0;

pub const FREE_TEXT_SCALE_RANGE: RangeInclusive<f32> = 0.05..=3.0;
pub const STICKER_SCALE_RANGE: RangeInclusive<f32> = 0.1..=1.5;
pub const DEFAULT_FREE_TEXT_SCALE: f32 = 1.0;
pub const DEFAULT_STICKER_SCALE: f32 = 0.3;

pub const DEFAULT_FREE_TEXT: &str = "Text";

pub(crate) fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

pub(crate) fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
