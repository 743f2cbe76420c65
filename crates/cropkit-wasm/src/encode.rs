//! Image encoding WASM bindings for exporting crop results.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_jpeg } from '@cropkit/wasm';
//!
//! const output = session.commit();
//! const png = encode_png(output);                  // keeps circle transparency
//! const jpeg = encode_jpeg(output, 90, 255, 255, 255); // white behind the circle
//! ```

use crate::types::JsBitmap;
use cropkit_core::encode;
use wasm_bindgen::prelude::*;

/// Encode a bitmap to PNG bytes, preserving alpha.
#[wasm_bindgen]
pub fn encode_png(image: &JsBitmap) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(&image.to_bitmap()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a bitmap to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Bitmap to encode
/// * `quality` - JPEG quality (1-100, recommended: 90)
/// * `r`, `g`, `b` - Background colour composited behind transparent pixels
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsBitmap, quality: u8, r: u8, g: u8, b: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(&image.to_bitmap(), quality, [r, g, b])
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
