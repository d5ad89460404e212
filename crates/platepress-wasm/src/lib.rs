//! PlatePress WASM - WebAssembly bindings for the upload encoder
//!
//! This crate exposes platepress-core to the admin dashboard and storefront so
//! photos can be shrunk in the browser before they are uploaded.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for the encoded result
//! - `encode` - Encoding bindings (custom options and the upload preset)
//!
//! # Usage
//!
//! ```typescript
//! import init, { encode_upload } from '@platepress/wasm';
//!
//! // Load the WASM module (generated loader, must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const encoded = encode_upload(bytes);
//! console.log(`Encoded ${encoded.width}x${encoded.height}, ${encoded.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod types;

pub use encode::{encode_image, encode_upload};
pub use types::JsEncodedImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
