//! JPEG export of crop results.
//!
//! JPEG has no alpha channel, so transparent pixels (the corners of a
//! circle crop) are composited over a solid background first.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::error::{validate, EncodeError};
use crate::decode::{Bitmap, CHANNELS};

/// Encode a bitmap to JPEG bytes.
///
/// # Arguments
///
/// * `bitmap` - RGBA output of a crop
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
/// * `background` - RGB colour shown through transparent pixels
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    bitmap: &Bitmap,
    quality: u8,
    background: [u8; 3],
) -> Result<Vec<u8>, EncodeError> {
    validate(bitmap)?;

    let quality = quality.clamp(1, 100);
    let rgb = flatten_alpha(&bitmap.pixels, background);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite RGBA over an opaque background, producing packed RGB.
fn flatten_alpha(rgba: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let a = px[3] as u32;
        for c in 0..3 {
            let v = (px[c] as u32 * a + background[c] as u32 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}
