//! Upload encoding WASM bindings.
//!
//! This module exposes the platepress-core size-budget encoder to JavaScript,
//! so photos can be shrunk in the browser before they are uploaded.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode with caller-supplied options
//! - [`encode_upload`] - Encode with the upload preset (1920px box, quality 80)
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, encode_upload } from '@platepress/wasm';
//!
//! // Upload preset
//! const encoded = encode_upload(bytes);
//!
//! // Custom options; omitted fields take their defaults
//! const jpeg = encode_image(bytes, { output_format: 'jpeg', max_size_bytes: 500000 });
//! const blob = new Blob([jpeg.bytes()], { type: jpeg.mime_type });
//! ```

use crate::types::JsEncodedImage;
use platepress_core::{search, EncodeError, EncodeOutcome, EncodingOptions, ImageRenderer};
use wasm_bindgen::prelude::*;

/// Encode an image so it fits the configured byte budget.
///
/// # Arguments
///
/// * `bytes` - Source image file bytes (JPEG, PNG, WebP)
/// * `options` - Plain object with any `EncodingOptions` fields, or `undefined`
///   for the defaults (2048px box, quality 85 down to 40, AVIF, 1 MiB)
///
/// # Returns
///
/// The encoded image with its dimensions, quality, and whether the budget was met.
/// When the quality floor is reached first the smallest candidate is still returned
/// and a warning is written to the browser console.
///
/// # Errors
///
/// Returns an error if:
/// - The options object has fields of the wrong type
/// - The source is not a decodable image
/// - The output format has no lossy encoder (webp, png)
#[wasm_bindgen]
pub fn encode_image(bytes: &[u8], options: JsValue) -> Result<JsEncodedImage, JsValue> {
    let options = parse_options(options)?;
    encode_with_options(bytes, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image with the upload preset.
///
/// Equivalent to `encode_image(bytes, { max_width: 1920, max_height: 1920, quality: 80 })`.
#[wasm_bindgen]
pub fn encode_upload(bytes: &[u8]) -> Result<JsEncodedImage, JsValue> {
    encode_with_options(bytes, &EncodingOptions::upload_defaults())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<EncodingOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(EncodingOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid encoding options: {}", e)))
}

/// Run the search and convert the outcome for JavaScript.
pub(crate) fn encode_with_options(
    bytes: &[u8],
    options: &EncodingOptions,
) -> Result<JsEncodedImage, EncodeError> {
    let outcome = search::search(&ImageRenderer, bytes, options)?;
    report_budget_unmet(&outcome);
    Ok(JsEncodedImage::from(outcome))
}

#[cfg(target_arch = "wasm32")]
fn report_budget_unmet(outcome: &EncodeOutcome) {
    if let Some(unmet) = outcome.budget_unmet() {
        web_sys::console::warn_1(&JsValue::from_str(&unmet.to_string()));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report_budget_unmet(_outcome: &EncodeOutcome) {}
