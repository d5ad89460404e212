//! Lossy encoding of a finished frame.
//!
//! AVIF goes through the `image` crate's rav1e-backed encoder, JPEG through
//! its baseline encoder. Both write full-resolution chroma.

use std::borrow::Cow;

use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use super::format::AVIF_MAX_EFFORT;
use super::OutputFormat;
use crate::EncodeError;

/// Codec parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecSettings<'a> {
    /// Target format
    pub format: OutputFormat,
    /// Encoder quality (1-100); out-of-range values are clamped
    pub quality: u8,
    /// Encoder effort; ignored by formats without an effort knob
    pub effort: u8,
    /// ICC profile to embed, when the codec supports it
    pub icc_profile: Option<&'a [u8]>,
}

impl<'a> CodecSettings<'a> {
    /// Settings with default effort and no ICC profile.
    pub fn new(format: OutputFormat, quality: u8) -> Self {
        Self {
            format,
            quality,
            effort: crate::options::DEFAULT_EFFORT,
            icc_profile: None,
        }
    }

    /// Set the encoder effort.
    pub fn with_effort(mut self, effort: u8) -> Self {
        self.effort = effort;
        self
    }

    /// Embed an ICC profile.
    pub fn with_icc_profile(mut self, icc_profile: Option<&'a [u8]>) -> Self {
        self.icc_profile = icc_profile;
        self
    }
}

/// Map an effort level (0 = fastest, 9 = smallest) to a rav1e speed (10 = fastest, 1 = slowest).
pub fn avif_speed(effort: u8) -> u8 {
    10 - effort.min(AVIF_MAX_EFFORT)
}

/// Encode a frame to the configured format.
///
/// Frames with alpha keep it when the format can carry it; otherwise alpha is
/// dropped (the frame stage flattens such frames beforehand).
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedFormat` for formats without a lossy encoder.
/// Returns `EncodeError::EncodingFailed` for empty frames or codec failures.
pub fn encode_frame(
    frame: &DynamicImage,
    settings: &CodecSettings<'_>,
) -> Result<Vec<u8>, EncodeError> {
    settings.format.ensure_lossy_encoder()?;

    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::EncodingFailed(format!(
            "Invalid dimensions: width ({width}) and height ({height}) must be non-zero"
        )));
    }

    let quality = settings.quality.clamp(1, 100);
    let (pixels, color) = pixel_layout(frame, settings.format.supports_alpha());
    let mut buffer = Vec::new();

    match settings.format {
        OutputFormat::Avif => {
            let mut encoder =
                AvifEncoder::new_with_speed_quality(&mut buffer, avif_speed(settings.effort), quality);
            attach_icc_profile(&mut encoder, settings.icc_profile);
            encoder
                .write_image(&pixels, width, height, color)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            attach_icc_profile(&mut encoder, settings.icc_profile);
            encoder
                .write_image(&pixels, width, height, color)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
        other @ (OutputFormat::WebP | OutputFormat::Png) => return Err(other.no_lossy_encoder()),
    }

    Ok(buffer)
}

/// Borrow the frame's bytes when they are already 8-bit RGB(A), convert otherwise.
fn pixel_layout(frame: &DynamicImage, keep_alpha: bool) -> (Cow<'_, [u8]>, ExtendedColorType) {
    match frame {
        DynamicImage::ImageRgb8(buf) => (Cow::Borrowed(buf.as_raw().as_slice()), ExtendedColorType::Rgb8),
        DynamicImage::ImageRgba8(buf) if keep_alpha => {
            (Cow::Borrowed(buf.as_raw().as_slice()), ExtendedColorType::Rgba8)
        }
        other if keep_alpha && other.color().has_alpha() => {
            (Cow::Owned(other.to_rgba8().into_raw()), ExtendedColorType::Rgba8)
        }
        other => (Cow::Owned(other.to_rgb8().into_raw()), ExtendedColorType::Rgb8),
    }
}

fn attach_icc_profile<E: ImageEncoder>(encoder: &mut E, icc_profile: Option<&[u8]>) {
    let Some(profile) = icc_profile else {
        return;
    };
    if encoder.set_icc_profile(profile.to_vec()).is_err() {
        tracing::debug!("Encoder does not embed ICC profiles; dropping {} bytes", profile.len());
    }
}
