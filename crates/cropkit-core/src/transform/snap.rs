//! Animated snap-back after a boundary correction.
//!
//! The transform state jumps to the corrected value immediately. This only
//! interpolates what is drawn, so cancelling it can never leak a partial
//! value into the next gesture's baseline. Time is supplied by the caller.

use std::time::Duration;

use crate::geometry::Placement;

/// A running ease-in-out transition between two placements.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapAnimation {
    from: Placement,
    to: Placement,
    duration: Duration,
    elapsed: Duration,
}

impl SnapAnimation {
    /// Returns `None` when `duration` is zero (snap instantly).
    pub fn new(from: Placement, to: Placement, duration: Duration) -> Option<Self> {
        if duration.is_zero() {
            return None;
        }
        Some(Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        })
    }

    /// Move the animation forward by `dt` and return the placement to draw.
    pub fn advance(&mut self, dt: Duration) -> Placement {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.current()
    }

    pub fn current(&self) -> Placement {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(&self.to, ease_in_out(t))
    }

    pub fn target(&self) -> Placement {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Smoothstep easing.
fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Offset;

    fn anim() -> SnapAnimation {
        SnapAnimation::new(
            Placement::new(Offset::new(50.0, 0.0), 1.0),
            Placement::IDENTITY,
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let anim = SnapAnimation::new(Placement::IDENTITY, Placement::IDENTITY, Duration::ZERO);
        assert!(anim.is_none());
    }

    #[test]
    fn test_starts_at_source() {
        let a = anim();
        assert_eq!(a.current().offset, Offset::new(50.0, 0.0));
        assert!(!a.is_finished());
    }

    #[test]
    fn test_midpoint_is_halfway() {
        let mut a = anim();
        let p = a.advance(Duration::from_millis(100));
        assert!((p.offset.dx - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_finishes_at_target_and_saturates() {
        let mut a = anim();
        a.advance(Duration::from_millis(150));
        let p = a.advance(Duration::from_millis(500));
        assert!(a.is_finished());
        assert_eq!(p, Placement::IDENTITY);
        assert_eq!(a.target(), Placement::IDENTITY);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=20 {
            let v = ease_in_out(i as f64 / 20.0);
            assert!(v >= last);
            last = v;
        }
        assert_eq!(ease_in_out(1.0), 1.0);
    }
}
