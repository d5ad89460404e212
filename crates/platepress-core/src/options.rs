//! Encoding options for the size-budget encoder.
//!
//! Every tunable of the search loop lives here with a documented default so
//! callers can override it per call. Options deserialize with serde and every
//! field is optional; missing fields take their default.

use serde::{Deserialize, Serialize};

use crate::encode::OutputFormat;

/// Default pixel ceiling for both width and height.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Default initial encoder quality.
pub const DEFAULT_QUALITY: u8 = 85;

/// Default quality floor; the search never encodes below it.
pub const DEFAULT_MIN_QUALITY: u8 = 40;

/// Default quality decrement applied when shrinking alone is not enough.
pub const DEFAULT_QUALITY_STEP: u8 = 5;

/// Default encoder effort (AVIF scale, 0 = fastest, 9 = smallest).
pub const DEFAULT_EFFORT: u8 = 6;

/// Default byte budget (1 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: usize = 1024 * 1024;

/// Options for one encode call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingOptions {
    /// Maximum output width in pixels
    pub max_width: u32,
    /// Maximum output height in pixels
    pub max_height: u32,
    /// Initial encoder quality (1-100)
    pub quality: u8,
    /// Quality floor (1-100)
    pub min_quality: u8,
    /// Quality decrement per over-budget iteration
    pub quality_step: u8,
    /// Output format
    pub output_format: OutputFormat,
    /// Encoder CPU effort, clamped to the format's maximum
    pub effort: u8,
    /// Progressive encoding hint; informational only
    pub progressive: bool,
    /// Drop ICC/EXIF/XMP payloads from the output
    pub strip_metadata: bool,
    /// Byte budget for the encoded output
    pub max_size_bytes: usize,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            min_quality: DEFAULT_MIN_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            output_format: OutputFormat::default(),
            effort: DEFAULT_EFFORT,
            progressive: false,
            strip_metadata: true,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl EncodingOptions {
    /// Create options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// The preset used for menu, receipt and avatar uploads:
    /// 1920x1920, quality 80, 1 MiB, AVIF.
    pub fn upload_defaults() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 80,
            ..Self::default()
        }
    }

    /// Pixel ceiling as dimensions.
    pub fn bounds(&self) -> crate::Dimensions {
        crate::Dimensions::new(self.max_width, self.max_height)
    }

    /// Clamp every knob into its legal range.
    ///
    /// Quality and floor land in 1..=100 and the initial quality is raised to
    /// the floor if it starts below it. The step, ceilings and budget are at
    /// least 1, and effort is capped at the output format's maximum.
    pub fn normalized(&self) -> Self {
        let min_quality = self.min_quality.clamp(1, 100);
        Self {
            max_width: self.max_width.max(1),
            max_height: self.max_height.max(1),
            quality: self.quality.clamp(1, 100).max(min_quality),
            min_quality,
            quality_step: self.quality_step.max(1),
            output_format: self.output_format,
            effort: self.effort.min(self.output_format.max_effort()),
            progressive: self.progressive,
            strip_metadata: self.strip_metadata,
            max_size_bytes: self.max_size_bytes.max(1),
        }
    }
}
