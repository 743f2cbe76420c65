//! Reduces pan and zoom gesture streams into [`TransformState`] updates.
//!
//! Pan and zoom are tracked independently and may be active at the same
//! time. Each reads only its own committed baseline, so the interleaving of
//! the two streams does not change the settled result. Boundary clamping
//! runs once, when the last active gesture ends.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clamp::{clamp, ClampLimits};
use super::snap::SnapAnimation;
use super::state::TransformState;
use crate::geometry::{Offset, Placement, Size};

/// One event from the gesture-input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureEvent {
    PanBegan,
    /// Translation since the previous pan update.
    PanChanged { dx: f64, dy: f64 },
    PanEnded,
    ZoomBegan,
    /// Cumulative magnification since the zoom began (1.0 = unchanged).
    ZoomChanged { magnification: f64 },
    ZoomEnded,
}

/// Advisory notification that a boundary correction moved the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapEvent {
    pub correction: Offset,
    pub scale_corrected: bool,
}

/// Gesture state machine for one crop window.
#[derive(Debug, Clone)]
pub struct GestureReducer {
    state: TransformState,
    displayed: Size,
    window: Size,
    limits: ClampLimits,
    snap_duration: Duration,
    /// Cumulative translation of the active pan.
    pan: Option<Offset>,
    zooming: bool,
    animation: Option<SnapAnimation>,
}

impl GestureReducer {
    /// `displayed` is the image size at scale 1, `window` the crop window size.
    pub fn new(
        displayed: Size,
        window: Size,
        limits: ClampLimits,
        snap_duration: Duration,
    ) -> Self {
        Self {
            state: TransformState::new(),
            displayed,
            window,
            limits,
            snap_duration,
            pan: None,
            zooming: false,
            animation: None,
        }
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    /// Whether any gesture is active.
    pub fn is_interacting(&self) -> bool {
        self.is_panning() || self.zooming
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The placement to draw: the snap animation while one runs, else the live transform.
    pub fn displayed(&self) -> Placement {
        match &self.animation {
            Some(animation) => animation.current(),
            None => self.state.live(),
        }
    }

    /// Apply one event. Returns a snap notification when the interaction
    /// ended and the clamp had to move the image.
    pub fn apply(&mut self, event: GestureEvent) -> Option<SnapEvent> {
        match event {
            GestureEvent::PanBegan => {
                self.begin_pan();
                None
            }
            GestureEvent::PanChanged { dx, dy } => {
                self.begin_pan();
                if dx.is_finite() && dy.is_finite() {
                    let total = self.pan.unwrap_or(Offset::ZERO) + Offset::new(dx, dy);
                    self.pan = Some(total);
                    self.state.offset = self.state.committed_offset + total;
                }
                None
            }
            GestureEvent::PanEnded => {
                self.pan.take()?;
                self.state.committed_offset = self.state.offset;
                self.settle_if_idle()
            }
            GestureEvent::ZoomBegan => {
                self.begin_zoom();
                None
            }
            GestureEvent::ZoomChanged { magnification } => {
                self.begin_zoom();
                if magnification.is_finite() {
                    let raw = magnification + self.state.committed_scale_delta;
                    self.state.scale = if raw < 1.0 { 1.0 } else { raw };
                }
                None
            }
            GestureEvent::ZoomEnded => {
                if !self.zooming {
                    return None;
                }
                self.zooming = false;
                if self.state.scale < 1.0 {
                    self.state.scale = 1.0;
                    self.state.committed_scale_delta = 0.0;
                } else {
                    self.state.committed_scale_delta = self.state.scale - 1.0;
                    self.state.scale = self.state.committed_scale();
                }
                self.settle_if_idle()
            }
        }
    }

    /// End every active gesture, clamping once at the end.
    pub fn finish(&mut self) -> Option<SnapEvent> {
        let mut snap = None;
        if self.is_panning() {
            snap = self.apply(GestureEvent::PanEnded).or(snap);
        }
        if self.zooming {
            snap = self.apply(GestureEvent::ZoomEnded).or(snap);
        }
        snap
    }

    /// Advance the snap animation by `dt`. Returns whether it is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if let Some(animation) = self.animation.as_mut() {
            animation.advance(dt);
            if animation.is_finished() {
                self.animation = None;
            }
        }
        self.animation.is_some()
    }

    fn begin_pan(&mut self) {
        if self.pan.is_none() {
            self.cancel_animation();
            self.pan = Some(Offset::ZERO);
        }
    }

    fn begin_zoom(&mut self) {
        if !self.zooming {
            self.cancel_animation();
            self.zooming = true;
        }
    }

    /// A new gesture interrupts the snap; drawing jumps to the live value.
    fn cancel_animation(&mut self) {
        if self.animation.take().is_some() {
            debug!("snap animation cancelled by new gesture");
        }
    }

    fn settle_if_idle(&mut self) -> Option<SnapEvent> {
        if self.is_interacting() {
            return None;
        }

        let before = self.state.live();
        let outcome = clamp(before, self.displayed, self.window, &self.limits);
        self.state.settle(outcome.placement);

        if !outcome.changed() {
            return None;
        }

        debug!(
            dx = outcome.correction.dx,
            dy = outcome.correction.dy,
            scale = outcome.placement.scale,
            "boundary clamp corrected transform"
        );
        self.animation = SnapAnimation::new(before, self.state.live(), self.snap_duration);
        Some(SnapEvent {
            correction: outcome.correction,
            scale_corrected: outcome.scale_corrected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::clamp::COVERAGE_TOLERANCE;

    const WINDOW: Size = Size::new(300.0, 300.0);

    fn reducer() -> GestureReducer {
        GestureReducer::new(WINDOW, WINDOW, ClampLimits::default(), Duration::from_millis(200))
    }

    fn pan(r: &mut GestureReducer, dx: f64, dy: f64) -> Option<SnapEvent> {
        r.apply(GestureEvent::PanBegan);
        r.apply(GestureEvent::PanChanged { dx, dy });
        r.apply(GestureEvent::PanEnded)
    }

    fn zoom(r: &mut GestureReducer, magnification: f64) -> Option<SnapEvent> {
        r.apply(GestureEvent::ZoomBegan);
        r.apply(GestureEvent::ZoomChanged { magnification });
        r.apply(GestureEvent::ZoomEnded)
    }

    #[test]
    fn test_pan_updates_accumulate_from_committed_offset() {
        let mut r = reducer();
        zoom(&mut r, 2.0);
        r.apply(GestureEvent::PanBegan);
        r.apply(GestureEvent::PanChanged { dx: 10.0, dy: 5.0 });
        r.apply(GestureEvent::PanChanged { dx: 15.0, dy: -5.0 });
        assert_eq!(r.state().offset, Offset::new(25.0, 0.0));
        assert_eq!(r.state().committed_offset, Offset::ZERO);
        assert!(r.apply(GestureEvent::PanEnded).is_none());
        assert_eq!(r.state().committed_offset, Offset::new(25.0, 0.0));

        // Second pan starts from the committed offset
        r.apply(GestureEvent::PanChanged { dx: -5.0, dy: 0.0 });
        assert_eq!(r.state().offset, Offset::new(20.0, 0.0));
    }

    #[test]
    fn test_pan_at_unit_scale_snaps_back() {
        let mut r = reducer();
        let snap = pan(&mut r, 50.0, 0.0).expect("snap expected");
        assert_eq!(snap.correction, Offset::new(-50.0, 0.0));
        assert_eq!(r.state().offset, Offset::ZERO);
        assert_eq!(r.state().committed_offset, Offset::ZERO);
        assert!(r.is_animating());
        // Drawing starts where the finger left the image
        assert_eq!(r.displayed().offset, Offset::new(50.0, 0.0));
    }

    #[test]
    fn test_zoom_is_additive_on_delta_baseline() {
        let mut r = reducer();
        zoom(&mut r, 1.5);
        assert_eq!(r.state().scale, 1.5);
        assert_eq!(r.state().committed_scale_delta, 0.5);

        // A new gesture starting at magnification 1.0 keeps the current scale
        r.apply(GestureEvent::ZoomBegan);
        r.apply(GestureEvent::ZoomChanged { magnification: 1.0 });
        assert_eq!(r.state().scale, 1.5);
        r.apply(GestureEvent::ZoomChanged { magnification: 1.5 });
        assert_eq!(r.state().scale, 2.0);
        r.apply(GestureEvent::ZoomEnded);
        assert_eq!(r.state().committed_scale(), 2.0);
        assert!(r.state().is_settled());
    }

    #[test]
    fn test_pinch_below_one_floors_scale() {
        let mut r = reducer();
        r.apply(GestureEvent::ZoomBegan);
        r.apply(GestureEvent::ZoomChanged { magnification: 0.3 });
        assert_eq!(r.state().scale, 1.0);
        assert!(zoom(&mut r, 0.5).is_none());
        assert_eq!(r.state().committed_scale(), 1.0);
        assert_eq!(r.state().committed_scale_delta, 0.0);
    }

    #[test]
    fn test_zoom_out_after_pan_snaps_offset() {
        let mut r = reducer();
        zoom(&mut r, 2.0);
        pan(&mut r, 140.0, 0.0);
        assert_eq!(r.state().offset, Offset::new(140.0, 0.0));

        // Pinching back to 1x leaves the image short of the left edge
        let snap = zoom(&mut r, 0.0).expect("snap expected");
        assert_eq!(r.state().scale, 1.0);
        assert_eq!(r.state().offset, Offset::ZERO);
        assert_eq!(snap.correction, Offset::new(-140.0, 0.0));
    }

    #[test]
    fn test_clamp_waits_for_all_gestures() {
        let mut r = reducer();
        r.apply(GestureEvent::ZoomBegan);
        r.apply(GestureEvent::PanBegan);
        r.apply(GestureEvent::PanChanged { dx: 80.0, dy: 0.0 });
        // Pan ends while zoom is still live: no clamp yet
        assert!(r.apply(GestureEvent::PanEnded).is_none());
        assert_eq!(r.state().offset, Offset::new(80.0, 0.0));
        assert!(r.is_interacting());

        r.apply(GestureEvent::ZoomChanged { magnification: 1.4 });
        let snap = r.apply(GestureEvent::ZoomEnded).expect("snap expected");
        // slack at 1.4x is 60
        assert!((r.state().offset.dx - 60.0).abs() < 1e-9);
        assert!((snap.correction.dx + 20.0).abs() < 1e-9);
        assert!(r.state().is_settled());
    }

    #[test]
    fn test_interleaving_does_not_change_result() {
        let mut a = reducer();
        a.apply(GestureEvent::PanBegan);
        a.apply(GestureEvent::ZoomBegan);
        a.apply(GestureEvent::PanChanged { dx: 30.0, dy: 10.0 });
        a.apply(GestureEvent::ZoomChanged { magnification: 2.0 });
        a.apply(GestureEvent::PanEnded);
        a.apply(GestureEvent::ZoomEnded);

        let mut b = reducer();
        b.apply(GestureEvent::ZoomBegan);
        b.apply(GestureEvent::ZoomChanged { magnification: 2.0 });
        b.apply(GestureEvent::PanBegan);
        b.apply(GestureEvent::PanChanged { dx: 30.0, dy: 10.0 });
        b.apply(GestureEvent::ZoomEnded);
        b.apply(GestureEvent::PanEnded);

        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_new_gesture_cancels_snap_animation() {
        let mut r = reducer();
        pan(&mut r, 50.0, 0.0);
        assert!(r.is_animating());
        r.advance(Duration::from_millis(50));

        r.apply(GestureEvent::PanBegan);
        assert!(!r.is_animating());
        assert_eq!(r.displayed(), r.state().live());
        assert_eq!(r.state().committed_offset, Offset::ZERO);
    }

    #[test]
    fn test_animation_runs_to_completion() {
        let mut r = reducer();
        pan(&mut r, 0.0, -30.0);
        assert!(r.advance(Duration::from_millis(100)));
        assert!(!r.advance(Duration::from_millis(100)));
        assert_eq!(r.displayed(), Placement::IDENTITY);
    }

    #[test]
    fn test_zero_duration_snaps_instantly() {
        let mut r = GestureReducer::new(WINDOW, WINDOW, ClampLimits::default(), Duration::ZERO);
        assert!(pan(&mut r, 50.0, 0.0).is_some());
        assert!(!r.is_animating());
        assert_eq!(r.displayed(), Placement::IDENTITY);
    }

    #[test]
    fn test_stray_end_events_are_ignored() {
        let mut r = reducer();
        assert!(r.apply(GestureEvent::PanEnded).is_none());
        assert!(r.apply(GestureEvent::ZoomEnded).is_none());
        assert_eq!(*r.state(), TransformState::new());
    }

    #[test]
    fn test_update_without_begin_starts_gesture() {
        let mut r = reducer();
        r.apply(GestureEvent::ZoomChanged { magnification: 3.0 });
        assert!(r.is_zooming());
        r.apply(GestureEvent::PanChanged { dx: 1.0, dy: 1.0 });
        assert!(r.is_panning());
    }

    #[test]
    fn test_finish_ends_everything_and_clamps() {
        let mut r = reducer();
        r.apply(GestureEvent::PanChanged { dx: 500.0, dy: 0.0 });
        r.apply(GestureEvent::ZoomChanged { magnification: 2.0 });
        let snap = r.finish();
        assert!(snap.is_some());
        assert!(!r.is_interacting());
        assert_eq!(r.state().offset, Offset::new(150.0, 0.0));
        assert!(r.state().is_settled());
        let rect = r.state().live().image_rect(WINDOW, WINDOW);
        assert!(rect.covers(WINDOW, COVERAGE_TOLERANCE));
    }

    #[test]
    fn test_non_finite_updates_are_dropped() {
        let mut r = reducer();
        r.apply(GestureEvent::PanChanged { dx: f64::NAN, dy: 0.0 });
        r.apply(GestureEvent::ZoomChanged { magnification: f64::INFINITY });
        assert_eq!(r.state().offset, Offset::ZERO);
        assert_eq!(r.state().scale, 1.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
