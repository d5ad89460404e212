//! The frame transform stage: one decode-transform-encode pass.
//!
//! Every call starts again from the caller's original bytes so that repeated
//! passes never compound resampling blur or codec artifacts.
//!
//! # Pipeline
//!
//! 1. Decode the source fresh
//! 2. Auto-orient from EXIF
//! 3. Resize to fit the target box (Lanczos3, no upscaling)
//! 4. Normalize the tonal range
//! 5. Sharpen with the fixed unsharp mask
//! 6. Strip metadata unless asked to keep the ICC profile
//! 7. Encode at the requested quality and effort (4:4:4, lossy)

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::decode::{decode_source, DecodedSource};
use crate::encode::{encode_frame, CodecSettings, OutputFormat};
use crate::transform::{normalize, resize_to_box, sharpen};
use crate::{Dimensions, EncodeError, EncodingOptions};

/// The output of one pass: encoded bytes plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCandidate {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Pixel dimensions of the encoded frame
    pub dimensions: Dimensions,
    /// Encoder quality used
    pub quality: u8,
    /// Output format
    pub format: OutputFormat,
}

impl EncodedCandidate {
    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the encoder produced no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Produce one encoded candidate from the original source bytes.
///
/// `target` is a bounding box: the frame is fitted inside it preserving its
/// aspect ratio and is never enlarged beyond its native size.
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedFormat` if `options.output_format` has no lossy encoder.
/// Returns `EncodeError::Decode` if the source is not a valid image.
/// Returns `EncodeError::EncodingFailed` if the codec fails.
pub fn render_frame(
    source: &[u8],
    target: Dimensions,
    quality: u8,
    options: &EncodingOptions,
) -> Result<EncodedCandidate, EncodeError> {
    let format = options.output_format;
    format.ensure_lossy_encoder()?;

    let DecodedSource { image, icc_profile } = decode_source(source)?;

    let keep_alpha = format.supports_alpha() && image.color().has_alpha();
    let working = if keep_alpha {
        DynamicImage::ImageRgba8(image.into_rgba8())
    } else if image.color().has_alpha() {
        DynamicImage::ImageRgb8(flatten_onto_white(&image.into_rgba8()))
    } else {
        DynamicImage::ImageRgb8(image.into_rgb8())
    };

    let mut frame = resize_to_box(working, target);
    normalize(&mut frame);
    let frame = sharpen(&frame);

    let icc_profile = if options.strip_metadata {
        None
    } else {
        icc_profile.as_deref()
    };

    let settings = CodecSettings::new(format, quality)
        .with_effort(options.effort)
        .with_icc_profile(icc_profile);
    let bytes = encode_frame(&frame, &settings)?;

    Ok(EncodedCandidate {
        bytes,
        dimensions: Dimensions::new(frame.width(), frame.height()),
        quality,
        format,
    })
}

/// Composite an RGBA image over an opaque white background.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_source(width: u32, height: u32, with_alpha: bool) -> Vec<u8> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new(&mut buffer);
        if with_alpha {
            let img = RgbaImage::from_fn(width, height, |x, y| {
                image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, if x < width / 2 { 0 } else { 255 }])
            });
            encoder
                .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
                .unwrap();
        } else {
            let img = RgbImage::from_fn(width, height, |x, y| {
                image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
            });
            encoder
                .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
                .unwrap();
        }
        buffer
    }

    fn jpeg_options() -> EncodingOptions {
        EncodingOptions {
            output_format: OutputFormat::Jpeg,
            ..EncodingOptions::default()
        }
    }

    fn jpeg_with_icc(width: u32, height: u32, profile: &[u8]) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([(x * 4) as u8, (y * 4) as u8, 60]));
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, 90);
        encoder.set_icc_profile(profile.to_vec()).unwrap();
        encoder
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    fn has_icc_marker(bytes: &[u8]) -> bool {
        bytes.windows(11).any(|w| w == b"ICC_PROFILE")
    }

    #[test]
    fn test_render_shrinks_to_target() {
        let source = png_source(300, 200, false);
        let candidate = render_frame(&source, Dimensions::new(150, 150), 80, &jpeg_options()).unwrap();

        assert_eq!(candidate.dimensions, Dimensions::new(150, 100));
        assert_eq!(candidate.quality, 80);
        assert_eq!(candidate.format, OutputFormat::Jpeg);

        let decoded = image::load_from_memory(&candidate.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (150, 100));
    }

    #[test]
    fn test_render_never_upscales() {
        let source = png_source(40, 30, false);
        let candidate = render_frame(&source, Dimensions::new(400, 400), 80, &jpeg_options()).unwrap();
        assert_eq!(candidate.dimensions, Dimensions::new(40, 30));
    }

    #[test]
    fn test_render_avif() {
        let source = png_source(48, 32, true);
        let mut options = EncodingOptions::default();
        options.effort = 0;
        let candidate = render_frame(&source, Dimensions::new(48, 48), 60, &options).unwrap();

        assert_eq!(candidate.format, OutputFormat::Avif);
        assert_eq!(candidate.dimensions, Dimensions::new(48, 32));
        assert_eq!(&candidate.bytes[4..8], b"ftyp");
    }

    #[test]
    fn test_render_jpeg_from_transparent_png() {
        let source = png_source(20, 20, true);
        let candidate = render_frame(&source, Dimensions::new(20, 20), 90, &jpeg_options()).unwrap();
        let decoded = image::load_from_memory(&candidate.bytes).unwrap().to_rgb8();
        // Transparent half sits on white
        let left = decoded.get_pixel(2, 10).0;
        assert!(left.iter().all(|&c| c > 200), "expected near-white, got {:?}", left);
    }

    #[test]
    fn test_render_rejects_lossless_formats() {
        let source = png_source(10, 10, false);
        let mut options = EncodingOptions::default();
        options.output_format = OutputFormat::WebP;
        let result = render_frame(&source, Dimensions::new(10, 10), 80, &options);
        assert!(matches!(result, Err(EncodeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_render_invalid_source() {
        let result = render_frame(b"not an image", Dimensions::new(10, 10), 80, &jpeg_options());
        assert!(matches!(result, Err(EncodeError::Decode(_))));
    }

    #[test]
    fn test_render_lower_quality_is_smaller() {
        let source = png_source(200, 200, false);
        let target = Dimensions::new(200, 200);
        let high = render_frame(&source, target, 95, &jpeg_options()).unwrap();
        let low = render_frame(&source, target, 30, &jpeg_options()).unwrap();
        assert!(low.len() < high.len(), "low={} high={}", low.len(), high.len());
    }

    #[test]
    fn test_render_keeps_icc_when_not_stripping() {
        let profile = vec![0x5Au8; 96];
        let source = jpeg_with_icc(40, 40, &profile);
        assert!(has_icc_marker(&source));

        let options = EncodingOptions {
            strip_metadata: false,
            ..jpeg_options()
        };
        let kept = render_frame(&source, Dimensions::new(40, 40), 80, &options).unwrap();
        assert!(has_icc_marker(&kept.bytes));
        assert!(kept.bytes.windows(profile.len()).any(|w| w == profile.as_slice()));
    }

    #[test]
    fn test_render_strips_icc_by_default() {
        let source = jpeg_with_icc(40, 40, &[0x5Au8; 96]);
        let stripped = render_frame(&source, Dimensions::new(40, 40), 80, &jpeg_options()).unwrap();
        assert!(!has_icc_marker(&stripped.bytes));
    }

    #[test]
    fn test_flatten_onto_white() {
        let img = RgbaImage::from_raw(
            3,
            1,
            vec![
                10, 20, 30, 255, // opaque
                10, 20, 30, 0, // transparent
                0, 0, 0, 128, // half black
            ],
        )
        .unwrap();
        let flat = flatten_onto_white(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(flat.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(2, 0).0, [127, 127, 127]);
    }

    #[test]
    fn test_candidate_accessors() {
        let candidate = EncodedCandidate {
            bytes: vec![1, 2, 3],
            dimensions: Dimensions::new(1, 1),
            quality: 50,
            format: OutputFormat::Jpeg,
        };
        assert_eq!(candidate.len(), 3);
        assert!(!candidate.is_empty());
        assert_eq!(candidate.into_bytes(), vec![1, 2, 3]);
    }
}
