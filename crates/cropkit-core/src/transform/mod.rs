//! The interactive pan/zoom transform.
//!
//! - [`TransformState`]: live and committed offset/scale of one session
//! - [`clamp`]: keeps the image covering the crop window
//! - [`GestureReducer`]: folds pan/zoom event streams into the state
//! - [`SnapAnimation`]: cancellable eased transition shown after a correction
//!
//! # Coordinate System
//!
//! - Offsets are in display points, positive = right/down
//! - Scale is relative to the aspect-filled displayed size, never below 1
//! - Origin is the crop window's top-left corner

mod clamp;
mod gesture;
mod snap;
mod state;

pub use clamp::{clamp, ClampLimits, ClampOutcome, COVERAGE_TOLERANCE};
pub use gesture::{GestureEvent, GestureReducer, SnapEvent};
pub use snap::SnapAnimation;
pub use state::TransformState;
