//! Session configuration.
//!
//! Every field has a default, so callers (and JS objects passed through the
//! WASM bindings) only need to name what they change.

use serde::{Deserialize, Serialize};

use crate::render::InterpolationFilter;
use crate::shape::ShapeSizes;
use crate::transform::ClampLimits;

/// Settings for one crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Window sizes for the fixed shapes.
    pub shape_sizes: ShapeSizes,
    /// Optional upper zoom bound enforced when an interaction settles.
    pub max_scale: Option<f64>,
    /// Snap-back animation length; 0 snaps instantly.
    pub snap_duration_ms: u64,
    /// Resampling filter for the output.
    pub filter: InterpolationFilter,
    /// Make pixels outside the circle transparent in circle crops.
    pub mask_circle_output: bool,
    /// Output pixels per crop window point.
    pub output_scale: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            shape_sizes: ShapeSizes::default(),
            max_scale: None,
            snap_duration_ms: 200,
            filter: InterpolationFilter::Bilinear,
            mask_circle_output: true,
            output_scale: 1.0,
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp_limits(&self) -> ClampLimits {
        ClampLimits {
            max_scale: self.max_scale,
        }
    }

    pub fn snap_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.snap_duration_ms)
    }
}
