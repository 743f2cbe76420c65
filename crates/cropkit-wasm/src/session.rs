//! Crop session WASM bindings.
//!
//! Shapes, configs, gesture events and preview frames cross the boundary as
//! plain JS objects via serde_wasm_bindgen, using the core crate's camelCase
//! serde names.
//!
//! # Example
//!
//! ```typescript
//! const shape = { kind: 'custom', size: { width: 200, height: 200 } };
//! const session = new CropSession(image, shape, {});
//!
//! session.handle_gesture({ type: 'zoomBegan' });
//! session.handle_gesture({ type: 'zoomChanged', magnification: 1.8 });
//! const update = session.handle_gesture({ type: 'zoomEnded' });
//! draw(update.frame);
//!
//! // requestAnimationFrame loop while update.frame.animating
//! draw(session.advance(16));
//!
//! const output = session.commit(); // 200x200 JsBitmap
//! ```

use std::time::Duration;

use crate::types::JsBitmap;
use cropkit_core::{CropConfig, CropError, CropSession, CropShape, SessionState};
use wasm_bindgen::prelude::*;

/// A crop session for JavaScript.
#[wasm_bindgen(js_name = CropSession)]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen(js_class = CropSession)]
impl JsCropSession {
    /// Open a session on `image`.
    ///
    /// `shape` and `config` may be `undefined`; they default to a circle and
    /// the default config. Config objects only need the fields they change.
    #[wasm_bindgen(constructor)]
    pub fn new(
        image: &JsBitmap,
        shape: JsValue,
        config: JsValue,
    ) -> Result<JsCropSession, JsValue> {
        let shape: CropShape = if shape.is_undefined() || shape.is_null() {
            CropShape::Circle
        } else {
            serde_wasm_bindgen::from_value(shape).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Self::open(image, shape, config).map_err(to_js_error)
    }

    /// Feed one gesture event. Returns `{ frame, snap }`.
    pub fn handle_gesture(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event =
            serde_wasm_bindgen::from_value(event).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let update = self.inner.handle(event).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&update).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance the snap animation by `ms` milliseconds and return the frame to draw.
    pub fn advance(&mut self, ms: f64) -> Result<JsValue, JsValue> {
        let frame = self.inner.advance(duration_from_ms(ms));
        serde_wasm_bindgen::to_value(&frame).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The frame to draw right now.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.frame())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the crop at the configured output size and close the session.
    pub fn commit(&mut self) -> Result<JsBitmap, JsValue> {
        self.inner
            .commit()
            .map(JsBitmap::from_bitmap)
            .map_err(report_commit_error)
    }

    /// Render the crop at an explicit pixel size and close the session.
    pub fn commit_at(&mut self, width: u32, height: u32) -> Result<JsBitmap, JsValue> {
        self.inner
            .commit_at(width, height)
            .map(JsBitmap::from_bitmap)
            .map_err(report_commit_error)
    }

    /// Abandon the session without output.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    /// Lifecycle state: "idle", "selecting", "interacting", "committed" or "cancelled".
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn shape_name(&self) -> String {
        self.inner.shape().display_name()
    }

    /// Crop window width in display points
    #[wasm_bindgen(getter)]
    pub fn window_width(&self) -> f64 {
        self.inner.window().width
    }

    /// Crop window height in display points
    #[wasm_bindgen(getter)]
    pub fn window_height(&self) -> f64 {
        self.inner.window().height
    }

    #[wasm_bindgen(getter)]
    pub fn output_width(&self) -> u32 {
        self.inner.output_size().0
    }

    #[wasm_bindgen(getter)]
    pub fn output_height(&self) -> u32 {
        self.inner.output_size().1
    }
}

impl JsCropSession {
    pub(crate) fn open(
        image: &JsBitmap,
        shape: CropShape,
        config: CropConfig,
    ) -> Result<Self, CropError> {
        let inner = CropSession::open(Some(image.to_bitmap()), shape, config)?;
        Ok(Self { inner })
    }
}

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn report_commit_error(err: CropError) -> JsValue {
    let message = err.to_string();
    if matches!(err, CropError::RasterInconsistency(_)) {
        web_sys::console::error_1(&JsValue::from_str(&message));
    } else {
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
    JsValue::from_str(&message)
}

/// Negative or non-finite frame times count as zero.
fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Selecting => "selecting",
        SessionState::Interacting => "interacting",
        SessionState::Committed => "committed",
        SessionState::Cancelled => "cancelled",
    }
}
