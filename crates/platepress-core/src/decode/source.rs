//! Decoding uploads of any supported container with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageDecoder, ImageReader};

use super::{DecodeError, DecodedSource, Orientation};
use crate::Dimensions;

/// Read the displayed size of an upload without decoding its pixels.
///
/// Only the container header is parsed, so a truncated body still probes
/// successfully and fails later in [`decode_source`]. The stored size is
/// swapped when the EXIF orientation turns the image by 90 or 270 degrees.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the header cannot be parsed.
pub fn probe_dimensions(bytes: &[u8]) -> Result<Dimensions, DecodeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .into_dimensions()
        .map_err(DecodeError::from_image_error)?;

    if width == 0 || height == 0 {
        return Err(DecodeError::CorruptedFile(format!(
            "image has zero size ({width}x{height})"
        )));
    }

    Ok(extract_orientation(bytes).oriented(Dimensions::new(width, height)))
}

/// Decode an upload from its original bytes and apply EXIF orientation.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if the image data is corrupted or truncated.
pub fn decode_source(bytes: &[u8]) -> Result<DecodedSource, DecodeError> {
    // EXIF is read separately; the pixel decoders ignore it.
    let orientation = extract_orientation(bytes);

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .into_decoder()
        .map_err(DecodeError::from_image_error)?;

    // A broken ICC chunk is not worth failing the upload over.
    let icc_profile = decoder.icc_profile().ok().flatten();

    let image = DynamicImage::from_decoder(decoder).map_err(DecodeError::from_image_error)?;

    Ok(DecodedSource {
        image: orientation.apply(image),
        icc_profile,
    })
}

/// Extract the EXIF orientation of an upload (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

/// Returns `Orientation::Normal` when there is no EXIF block or no orientation tag.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}
