//! Encoding errors and the buffer checks shared by the encoders.

use thiserror::Error;

use crate::decode::Bitmap;

/// Errors that can occur while encoding an output bitmap.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero, or the buffer size they imply overflows
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

pub(crate) fn validate(bitmap: &Bitmap) -> Result<(), EncodeError> {
    let invalid_dimensions = || EncodeError::InvalidDimensions {
        width: bitmap.width,
        height: bitmap.height,
    };
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(invalid_dimensions());
    }
    let expected = bitmap.expected_len().ok_or_else(invalid_dimensions)?;
    if bitmap.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: bitmap.pixels.len(),
        });
    }
    Ok(())
}
