//! Source decoding for the encoder.
//!
//! This module provides functionality for:
//! - Probing the displayed (orientation-corrected) size of an upload
//! - Decoding an upload fresh from its original bytes
//! - Reading the EXIF orientation and applying it to the pixels
//!
//! Sources are never mutated. Every candidate in the search loop calls
//! [`decode_source`] again on the caller's bytes instead of reusing a resized
//! intermediate.

mod source;
mod types;

pub use source::{decode_source, get_orientation, probe_dimensions};
pub use types::{DecodeError, DecodedSource, Orientation};
