use thiserror::Error;

use crate::decode::DecodeError;

/// Errors that abort an encode.
///
/// Both the decode and format errors are fatal: the search loop never retries
/// them. Missing the byte budget is not represented here, see
/// [`crate::BudgetUnmet`].
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The source bytes are not a recognized or valid image
    #[error("Invalid image: {0}")]
    Decode(#[from] DecodeError),

    /// The requested output format has no lossy encoder available
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The codec failed while encoding a frame
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
