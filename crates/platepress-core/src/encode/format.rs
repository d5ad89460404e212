//! Output format naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EncodeError;

/// Highest effort level accepted by the AVIF encoder.
pub(crate) const AVIF_MAX_EFFORT: u8 = 9;

/// Output container/codec for the encoded upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// AV1 still image; the most size-efficient format available.
    #[default]
    Avif,
    /// Baseline JPEG.
    Jpeg,
    /// WebP (lossless encoder only, rejected for encoding).
    WebP,
    /// PNG (lossless, rejected for encoding).
    Png,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
        }
    }

    /// MIME type for upload responses.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Avif => "image/avif",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Png => "image/png",
        }
    }

    /// Whether a lossy, quality-driven encoder exists for this format.
    pub fn supports_lossy(self) -> bool {
        matches!(self, OutputFormat::Avif | OutputFormat::Jpeg)
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    /// Highest effort level of the format's encoder; 0 when it has no effort knob.
    pub fn max_effort(self) -> u8 {
        match self {
            OutputFormat::Avif => AVIF_MAX_EFFORT,
            _ => 0,
        }
    }

    /// Fail with `UnsupportedFormat` unless a lossy encoder exists.
    pub fn ensure_lossy_encoder(self) -> Result<(), EncodeError> {
        if self.supports_lossy() {
            Ok(())
        } else {
            Err(self.no_lossy_encoder())
        }
    }

    pub(crate) fn no_lossy_encoder(self) -> EncodeError {
        EncodeError::UnsupportedFormat(format!("{self} has no lossy encoder"))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Avif => "AVIF",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Png => "PNG",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    /// Parse a format name or file extension, case-insensitively, with or
    /// without a leading dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            "avif" => Ok(OutputFormat::Avif),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            "png" => Ok(OutputFormat::Png),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}
