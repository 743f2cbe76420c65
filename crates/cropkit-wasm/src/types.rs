//! WASM-compatible wrapper types for bitmaps.
//!
//! Bitmaps cross the boundary as RGBA8, 4 bytes per pixel, row-major, the
//! same layout as canvas `ImageData`.

use cropkit_core::decode::Bitmap;
use wasm_bindgen::prelude::*;

/// An RGBA bitmap wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from dimensions and RGBA pixel data.
    ///
    /// The buffer is not checked here; sessions and encoders reject
    /// mismatched buffers.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array. This is a copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels: bitmap.pixels,
        }
    }

    /// Convert to a core bitmap. Clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Bitmap {
        Bitmap::new(self.width, self.height, self.pixels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_creation() {
        let img = JsBitmap::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
        assert!(img.to_bitmap().is_readable());
    }

    #[test]
    fn test_round_trip_through_core() {
        let core = Bitmap::filled(3, 2, [1, 2, 3, 4]);
        let js = JsBitmap::from_bitmap(core.clone());
        assert_eq!(js.to_bitmap(), core);
        assert_eq!(js.pixels(), core.pixels);
    }

    #[test]
    fn test_mismatched_buffer_is_unreadable() {
        let js = JsBitmap::new(10, 10, vec![0u8; 7]);
        assert!(!js.to_bitmap().is_readable());
    }
}
