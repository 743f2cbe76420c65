//! Plane geometry shared by the crop engine.
//!
//! All values are in display coordinates (points) unless noted otherwise.
//! The crop window has its origin at its own top-left corner and extends to
//! `(width, height)`.

use serde::{Deserialize, Serialize};

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn has_positive_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Multiply both dimensions by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// A pan translation. Any sign is valid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl std::ops::Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

/// One offset/scale pair: the image is scaled about its own centre by
/// `scale`, then translated by `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub offset: Offset,
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        offset: Offset::ZERO,
        scale: 1.0,
    };

    pub const fn new(offset: Offset, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// Linear interpolation between two placements, `t` in `[0, 1]`.
    pub fn lerp(&self, to: &Placement, t: f64) -> Placement {
        let t = t.clamp(0.0, 1.0);
        Placement {
            offset: Offset::new(
                self.offset.dx + (to.offset.dx - self.offset.dx) * t,
                self.offset.dy + (to.offset.dy - self.offset.dy) * t,
            ),
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }

    /// The on-screen rectangle of an image of `displayed` size under this
    /// placement, in the frame of a crop window of size `window`.
    ///
    /// At identity the image is centred on the window.
    pub fn image_rect(&self, displayed: Size, window: Size) -> ImageRect {
        let half_w = displayed.width * self.scale / 2.0;
        let half_h = displayed.height * self.scale / 2.0;
        let cx = window.width / 2.0 + self.offset.dx;
        let cy = window.height / 2.0 + self.offset.dy;
        ImageRect {
            min_x: cx - half_w,
            min_y: cy - half_h,
            max_x: cx + half_w,
            max_y: cy + half_h,
        }
    }
}

/// Axis-aligned rectangle in crop window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ImageRect {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether this rectangle covers the whole window, allowing `tolerance`
    /// points of slack on each edge for floating point error.
    pub fn covers(&self, window: Size, tolerance: f64) -> bool {
        self.min_x <= tolerance
            && self.min_y <= tolerance
            && self.max_x >= window.width - tolerance
            && self.max_y >= window.height - tolerance
    }
}

/// Size of `source` when aspect-filled into `window`.
///
/// The result covers the window on both axes and matches it exactly on at
/// least one. Degenerate inputs return the window size.
pub fn fill_size(source: Size, window: Size) -> Size {
    if !source.has_positive_area() || !window.has_positive_area() {
        return window;
    }
    let factor = (window.width / source.width).max(window.height / source.height);
    Size::new(
        (source.width * factor).max(window.width),
        (source.height * factor).max(window.height),
    )
}
