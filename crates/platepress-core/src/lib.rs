//! PlatePress Core - size-budgeted image encoding for uploads
//!
//! This crate turns an arbitrary uploaded photograph (menu item photo, receipt
//! scan, avatar) into a compressed artifact that fits a pixel envelope and a
//! byte budget, searching over resolution and encoder quality until the budget
//! is met or the quality floor is reached.
//!
//! # Module Structure
//!
//! - `options` - Encoding options and their defaults
//! - `decode` - Source decoding with EXIF orientation handling
//! - `transform` - Resize, tonal normalization and sharpening
//! - `histogram` - Luminance histogram used by normalization
//! - `encode` - Output formats and the lossy codecs
//! - `frame` - One decode-transform-encode pass (a candidate)
//! - `search` - The size-budget search loop
//!
//! # Examples
//!
//! ```ignore
//! use platepress_core::{encode, EncodingOptions};
//!
//! let upload = std::fs::read("dish.jpg").unwrap();
//! let avif = encode(&upload, &EncodingOptions::upload_defaults()).unwrap();
//! println!("Encoded {} bytes", avif.len());
//! ```

pub mod decode;
pub mod encode;
pub mod frame;
pub mod histogram;
pub mod options;
pub mod search;
pub mod transform;

mod error;

pub use encode::OutputFormat;
pub use error::EncodeError;
pub use frame::EncodedCandidate;
pub use options::EncodingOptions;
pub use search::{Attempt, BudgetUnmet, EncodeOutcome, FrameRenderer, ImageRenderer};

use serde::{Deserialize, Serialize};

/// Pixel dimensions of an image or of a target bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Create a new Dimensions value
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check whether both sides fit inside `bounds`.
    pub fn fits_within(self, bounds: Dimensions) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }

    /// Component-wise minimum of two dimension pairs.
    pub fn min(self, other: Dimensions) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Scale both sides by `factor`, rounding down and never below 1x1.
    ///
    /// Rounding down keeps a shrink factor below 1.0 strictly shrinking for
    /// every side larger than one pixel.
    pub fn scale(self, factor: f64) -> Self {
        let scale_side = |side: u32| ((side as f64 * factor).floor() as u32).max(1);
        Self {
            width: scale_side(self.width),
            height: scale_side(self.height),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Encode an uploaded image so it fits the configured pixel envelope and byte budget.
///
/// The source bytes are only read; every candidate is decoded fresh from them.
/// Reaching the quality floor without meeting the budget is not an error: the
/// floor-quality candidate is returned. Use [`encode_with_report`] to find out
/// whether the budget was met.
///
/// # Errors
///
/// * [`EncodeError::Decode`] if the bytes are not a recognized, valid image
/// * [`EncodeError::UnsupportedFormat`] if the output format has no lossy encoder
/// * [`EncodeError::EncodingFailed`] if the codec rejects a frame
pub fn encode(source: &[u8], options: &EncodingOptions) -> Result<Vec<u8>, EncodeError> {
    encode_with_report(source, options).map(EncodeOutcome::into_bytes)
}

/// Like [`encode`], but returns the winning candidate together with every
/// attempt the search made and the budget verdict.
pub fn encode_with_report(
    source: &[u8],
    options: &EncodingOptions,
) -> Result<EncodeOutcome, EncodeError> {
    search::search(&ImageRenderer, source, options)
}
