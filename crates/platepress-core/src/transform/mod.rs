//! Geometric and tonal operations of the frame transform stage.
//!
//! # Transform Order
//!
//! Each candidate frame goes through these steps in order:
//! 1. Auto-orient (done while decoding, see [`crate::decode`])
//! 2. Resize to fit the target box, never enlarging
//! 3. Normalize the tonal range
//! 4. Sharpen to counter resampling blur
//!
//! Resize runs after orientation because the target box is expressed in
//! displayed width and height.

mod resize;
mod sharpen;
mod tone;

pub use resize::{fit_within, resize_to_box};
pub use sharpen::{sharpen, SHARPEN_SIGMA, SHARPEN_THRESHOLD};
pub use tone::{normalize, stretch_channels, NORMALIZE_HIGH_PERCENTILE, NORMALIZE_LOW_PERCENTILE};
