//! Output formats and lossy codecs.
//!
//! This module provides functionality for:
//! - Naming and parsing output formats ([`OutputFormat`])
//! - Encoding a finished frame to AVIF or JPEG at a given quality and effort
//!
//! Both codecs encode with full-resolution chroma (4:4:4) and never in
//! lossless mode. WebP and PNG are recognized but rejected with
//! [`crate::EncodeError::UnsupportedFormat`] because only lossless encoders
//! exist for them in the codec stack.
//!
//! # Examples
//!
//! ```ignore
//! use platepress_core::encode::{encode_frame, CodecSettings};
//! use platepress_core::OutputFormat;
//!
//! let frame = image::DynamicImage::new_rgb8(100, 100);
//! let settings = CodecSettings::new(OutputFormat::Jpeg, 80);
//! let bytes = encode_frame(&frame, &settings).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod codec;
mod format;

pub use codec::{avif_speed, encode_frame, CodecSettings};
pub use format::OutputFormat;
