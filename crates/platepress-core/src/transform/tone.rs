//! Tonal normalization (contrast stretch).
//!
//! Phone captures of plates and receipts tend to come out washed out. The
//! stretch maps the 1st..99th luminance percentile onto the full 0-255 range,
//! using the same lookup table for every color channel so hues do not shift.

use image::DynamicImage;

use crate::histogram::LuminanceHistogram;

/// Fraction of pixels allowed to clip to black.
pub const NORMALIZE_LOW_PERCENTILE: f64 = 0.01;

/// Fraction of pixels at or below the new white point.
pub const NORMALIZE_HIGH_PERCENTILE: f64 = 0.99;

/// Stretch the tonal range of an image in place.
///
/// 8-bit RGB and RGBA images are stretched directly; any other layout is
/// converted to RGBA8 first. Alpha is never modified.
pub fn normalize(image: &mut DynamicImage) {
    match image {
        DynamicImage::ImageRgb8(buf) => stretch_channels(buf, 3),
        DynamicImage::ImageRgba8(buf) => stretch_channels(buf, 4),
        other => {
            let mut rgba = other.to_rgba8();
            stretch_channels(&mut rgba, 4);
            *other = DynamicImage::ImageRgba8(rgba);
        }
    }
}

/// Stretch an interleaved 8-bit buffer with `channels` (3 or 4) per pixel.
///
/// Returns without touching the buffer when the image is flat (black point
/// equals white point) or empty.
pub fn stretch_channels(pixels: &mut [u8], channels: usize) {
    let hist = LuminanceHistogram::from_pixels(pixels, channels);

    let (Some(low), Some(high)) = (
        hist.percentile(NORMALIZE_LOW_PERCENTILE),
        hist.percentile(NORMALIZE_HIGH_PERCENTILE),
    ) else {
        return;
    };

    if high <= low || (low == 0 && high == 255) {
        return;
    }

    let lut = stretch_lut(low, high);
    for px in pixels.chunks_exact_mut(channels) {
        for value in &mut px[..3] {
            *value = lut[*value as usize];
        }
    }
}

/// Lookup table mapping `low..=high` linearly onto `0..=255`, clamping outside.
fn stretch_lut(low: u8, high: u8) -> [u8; 256] {
    let range = (high - low) as f32;
    let mut lut = [0u8; 256];
    for (level, out) in lut.iter_mut().enumerate() {
        let stretched = (level as f32 - low as f32) * 255.0 / range;
        *out = stretched.clamp(0.0, 255.0).round() as u8;
    }
    lut
}
