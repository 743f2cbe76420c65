//! Cropkit WASM - WebAssembly bindings for the cropkit crop engine
//!
//! This crate exposes cropkit-core to JavaScript/TypeScript applications.
//! The host page supplies the image, forwards pointer gestures, and draws
//! the preview frames; everything else runs in WASM.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible bitmap wrapper
//! - `session` - The `CropSession` class
//! - `decode` - Image decoding bindings (JPEG, PNG)
//! - `encode` - Image encoding bindings (PNG, JPEG export)
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, shape_options, CropSession } from '@cropkit/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const [circle] = shape_options();
//! const session = new CropSession(image, circle.shape, {});
//! ```

use cropkit_core::CropShape;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod types;

pub use decode::{decode_image, get_orientation};
pub use encode::{encode_jpeg, encode_png};
pub use session::JsCropSession;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// One entry of the shape picker.
#[derive(Debug, Clone, Serialize)]
struct ShapeOption {
    label: String,
    shape: CropShape,
}

fn shape_option_list() -> Vec<ShapeOption> {
    cropkit_core::default_options()
        .into_iter()
        .map(|shape| ShapeOption {
            label: shape.display_name(),
            shape,
        })
        .collect()
}

/// The default shape options as `[{ label, shape }]`, in picker order.
#[wasm_bindgen]
pub fn shape_options() -> Result<js_sys::Array, JsValue> {
    let array = js_sys::Array::new();
    for option in shape_option_list() {
        let value =
            serde_wasm_bindgen::to_value(&option).map_err(|e| JsValue::from_str(&e.to_string()))?;
        array.push(&value);
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_shape_option_labels() {
        let labels: Vec<String> = shape_option_list().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Circle", "Square", "Rectangle", "Custom 200X200"]);
    }
}
