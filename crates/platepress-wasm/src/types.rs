//! WASM-compatible wrapper for an encoded upload.

use platepress_core::EncodeOutcome;
use wasm_bindgen::prelude::*;

/// The result of an encode, exposed to JavaScript.
///
/// `bytes()` copies the encoded data into a `Uint8Array`; the metadata getters
/// are cheap.
#[wasm_bindgen]
pub struct JsEncodedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    quality: u8,
    extension: &'static str,
    mime_type: &'static str,
    budget_met: bool,
    passes: u32,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Encoded width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Encoded height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoder quality of the returned candidate
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encoded size in bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// File extension for the output (without the dot)
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.extension.to_string()
    }

    /// MIME type for the output
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    /// False when the quality floor was reached before the byte budget
    #[wasm_bindgen(getter)]
    pub fn budget_met(&self) -> bool {
        self.budget_met
    }

    /// Number of candidates the search encoded
    #[wasm_bindgen(getter)]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Returns the encoded bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<EncodeOutcome> for JsEncodedImage {
    fn from(outcome: EncodeOutcome) -> Self {
        let budget_met = outcome.budget_met();
        let passes = outcome.attempts.len() as u32;
        let candidate = outcome.candidate;
        Self {
            width: candidate.dimensions.width,
            height: candidate.dimensions.height,
            quality: candidate.quality,
            extension: candidate.format.extension(),
            mime_type: candidate.format.mime_type(),
            budget_met,
            passes,
            bytes: candidate.bytes,
        }
    }
}
