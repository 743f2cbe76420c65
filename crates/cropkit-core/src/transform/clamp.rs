//! Boundary clamping.
//!
//! Keeps the transformed image covering the whole crop window. The image
//! rectangle is the displayed image scaled about its centre by `scale` and
//! moved by `offset`; it covers the window when
//! `min_x <= 0`, `min_y <= 0`, `max_x >= width` and `max_y >= height`.
//!
//! On each axis the image overhangs the window by
//! `slack = (displayed * scale - window) / 2` per side, so coverage is the
//! same as `|offset| <= slack`. Clamping the offset into that interval moves
//! it by exactly the penetration depth of the violated edge, and clamping an
//! already clamped offset is a no-op.
//!
//! The clamp is total: any offset/scale pair maps to a covering placement.

use serde::{Deserialize, Serialize};

use crate::geometry::{Offset, Placement, Size};

/// Tolerance, in points, used when checking coverage after float arithmetic.
pub const COVERAGE_TOLERANCE: f64 = 1e-6;

/// Scale bounds enforced by the clamp. The lower bound is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClampLimits {
    pub max_scale: Option<f64>,
}

/// Result of one clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampOutcome {
    /// The covering placement.
    pub placement: Placement,
    /// Translation applied to the input offset.
    pub correction: Offset,
    /// Whether the scale had to be changed.
    pub scale_corrected: bool,
}

impl ClampOutcome {
    /// Whether anything moved, i.e. a snap should be signalled.
    pub fn changed(&self) -> bool {
        self.scale_corrected || !self.correction.is_zero()
    }
}

/// Clamp `placement` so an image of `displayed` size covers `window`.
pub fn clamp(
    placement: Placement,
    displayed: Size,
    window: Size,
    limits: &ClampLimits,
) -> ClampOutcome {
    let scale = clamp_scale(placement.scale, limits);
    let input = Offset::new(
        finite_or_zero(placement.offset.dx),
        finite_or_zero(placement.offset.dy),
    );

    let dx = clamp_axis(input.dx, displayed.width * scale, window.width);
    let dy = clamp_axis(input.dy, displayed.height * scale, window.height);
    let corrected = Offset::new(dx, dy);

    ClampOutcome {
        placement: Placement::new(corrected, scale),
        correction: corrected - placement.offset,
        scale_corrected: scale != placement.scale,
    }
}

fn clamp_scale(scale: f64, limits: &ClampLimits) -> f64 {
    if !scale.is_finite() {
        return 1.0;
    }
    let mut scale = scale.max(1.0);
    if let Some(max) = limits.max_scale.filter(|m| m.is_finite() && *m >= 1.0) {
        scale = scale.min(max);
    }
    scale
}

fn clamp_axis(offset: f64, image_extent: f64, window_extent: f64) -> f64 {
    let slack = (image_extent - window_extent) / 2.0;
    if slack.is_nan() || slack < 0.0 {
        // Image narrower than the window: no offset can cover it, keep it centred.
        return 0.0;
    }
    offset.clamp(-slack, slack)
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::fill_size;
    use proptest::prelude::*;

    fn window_strategy() -> impl Strategy<Value = Size> {
        (10.0f64..=800.0, 10.0f64..=800.0).prop_map(|(w, h)| Size::new(w, h))
    }

    fn source_strategy() -> impl Strategy<Value = Size> {
        (1.0f64..=5000.0, 1.0f64..=5000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    fn placement_strategy() -> impl Strategy<Value = Placement> {
        (-5000.0f64..=5000.0, -5000.0f64..=5000.0, 1.0f64..=10.0)
            .prop_map(|(dx, dy, s)| Placement::new(Offset::new(dx, dy), s))
    }

    proptest! {
        /// Property: After clamping, the image covers the window on all four sides.
        #[test]
        fn prop_clamped_placement_covers_window(
            window in window_strategy(),
            source in source_strategy(),
            placement in placement_strategy(),
        ) {
            let displayed = fill_size(source, window);
            let out = clamp(placement, displayed, window, &ClampLimits::default());
            let rect = out.placement.image_rect(displayed, window);
            prop_assert!(
                rect.covers(window, COVERAGE_TOLERANCE),
                "rect {:?} window {:?}",
                rect,
                window
            );
        }

        /// Property: Clamping twice gives the same result as clamping once.
        #[test]
        fn prop_clamp_is_idempotent(
            window in window_strategy(),
            source in source_strategy(),
            placement in placement_strategy(),
            max in proptest::option::of(1.0f64..=8.0),
        ) {
            let displayed = fill_size(source, window);
            let limits = ClampLimits { max_scale: max };
            let once = clamp(placement, displayed, window, &limits);
            let twice = clamp(once.placement, displayed, window, &limits);
            prop_assert_eq!(once.placement, twice.placement);
            prop_assert!(!twice.changed());
        }

        /// Property: The correction never exceeds the penetration depth.
        #[test]
        fn prop_correction_is_minimal(
            window in window_strategy(),
            placement in placement_strategy(),
        ) {
            let out = clamp(placement, window, window, &ClampLimits::default());
            let rect = placement.image_rect(window, window);
            let depth_x = rect.min_x.max(0.0).max(window.width - rect.max_x);
            let depth_y = rect.min_y.max(0.0).max(window.height - rect.max_y);
            prop_assert!((out.correction.dx.abs() - depth_x).abs() < 1e-6);
            prop_assert!((out.correction.dy.abs() - depth_y).abs() < 1e-6);
        }

        /// Property: Scale never drops below 1.
        #[test]
        fn prop_scale_floor(scale in -10.0f64..=10.0) {
            let window = Size::new(300.0, 300.0);
            let placement = Placement::new(Offset::ZERO, scale);
            let out = clamp(placement, window, window, &ClampLimits::default());
            prop_assert!(out.placement.scale >= 1.0);
        }
    }
}
