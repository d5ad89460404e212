//! Fit-inside resizing with a Lanczos3 kernel.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::Dimensions;

/// Calculate the largest size that fits inside `bounds` while preserving the
/// aspect ratio of `native`.
///
/// The result never exceeds `native` (no upscaling), never exceeds `bounds`,
/// and is never smaller than 1x1. A zero-sized `native` yields 0x0.
///
/// # Example
///
/// ```ignore
/// use platepress_core::{transform::fit_within, Dimensions};
///
/// let fitted = fit_within(Dimensions::new(6000, 4000), Dimensions::new(2560, 2560));
/// assert_eq!(fitted, Dimensions::new(2560, 1707));
/// ```
pub fn fit_within(native: Dimensions, bounds: Dimensions) -> Dimensions {
    if native.width == 0 || native.height == 0 {
        return Dimensions::new(0, 0);
    }
    if native.fits_within(bounds) {
        return native;
    }

    let scale = (bounds.width as f64 / native.width as f64)
        .min(bounds.height as f64 / native.height as f64)
        .min(1.0);

    let fit_side = |side: u32, limit: u32| {
        ((side as f64 * scale).round() as u32)
            .clamp(1, limit.max(1))
            .min(side)
    };

    Dimensions::new(
        fit_side(native.width, bounds.width),
        fit_side(native.height, bounds.height),
    )
}

/// Resize an image to fit inside `bounds` using Lanczos3 resampling.
///
/// The image is returned untouched when it already has the fitted size, which
/// includes every image smaller than `bounds`.
pub fn resize_to_box(image: DynamicImage, bounds: Dimensions) -> DynamicImage {
    let native = Dimensions::new(image.width(), image.height());
    let fitted = fit_within(native, bounds);

    if fitted == native {
        return image;
    }

    image.resize_exact(fitted.width, fitted.height, FilterType::Lanczos3)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
