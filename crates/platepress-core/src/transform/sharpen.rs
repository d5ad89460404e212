//! Fixed unsharp mask applied after downsampling.
//!
//! The parameters are calibrated once for food and product photography and are
//! deliberately not exposed as options.

use image::{DynamicImage, ImageBuffer, Pixel};

/// Gaussian sigma of the unsharp mask, in pixels.
pub const SHARPEN_SIGMA: f32 = 0.8;

/// Minimum difference (0-255) between a pixel and its blur before it is sharpened.
pub const SHARPEN_THRESHOLD: i32 = 2;

/// Apply the fixed unsharp mask to the colour channels.
///
/// Alpha is carried over from the input unchanged.
pub fn sharpen(image: &DynamicImage) -> DynamicImage {
    match (image, image.unsharpen(SHARPEN_SIGMA, SHARPEN_THRESHOLD)) {
        (DynamicImage::ImageRgba8(original), DynamicImage::ImageRgba8(mut sharpened)) => {
            restore_alpha(&mut sharpened, original);
            DynamicImage::ImageRgba8(sharpened)
        }
        (DynamicImage::ImageLumaA8(original), DynamicImage::ImageLumaA8(mut sharpened)) => {
            restore_alpha(&mut sharpened, original);
            DynamicImage::ImageLumaA8(sharpened)
        }
        (_, sharpened) => sharpened,
    }
}

/// Copy the last channel of every pixel of `original` into `target`.
fn restore_alpha<P>(target: &mut ImageBuffer<P, Vec<u8>>, original: &ImageBuffer<P, Vec<u8>>)
where
    P: Pixel<Subpixel = u8>,
{
    let alpha = P::CHANNEL_COUNT as usize - 1;
    for (dst, src) in target.pixels_mut().zip(original.pixels()) {
        dst.channels_mut()[alpha] = src.channels()[alpha];
    }
}
