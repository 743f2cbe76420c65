//! Crop shapes and the sizes and masks they resolve to.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Clip mask applied to the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipMask {
    /// Plain rectangle, nothing clipped.
    #[default]
    None,
    /// Ellipse inscribed in the window bounds.
    Ellipse,
}

impl ClipMask {
    /// Whether the pixel centred at `(x, y)` lies inside the mask for a
    /// `width` x `height` raster.
    #[inline]
    pub fn contains(self, x: f64, y: f64, width: f64, height: f64) -> bool {
        match self {
            ClipMask::None => true,
            ClipMask::Ellipse => {
                let rx = width / 2.0;
                let ry = height / 2.0;
                let nx = (x - rx) / rx;
                let ny = (y - ry) / ry;
                nx * nx + ny * ny <= 1.0
            }
        }
    }
}

/// A crop shape the user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CropShape {
    Circle,
    Square,
    Rectangle,
    /// Arbitrary window size; must have positive area.
    Custom { size: Size },
}

/// Canonical window sizes for the fixed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSizes {
    pub circle: Size,
    pub square: Size,
    pub rectangle: Size,
}

impl Default for ShapeSizes {
    fn default() -> Self {
        Self {
            circle: Size::new(300.0, 300.0),
            square: Size::new(300.0, 300.0),
            rectangle: Size::new(300.0, 500.0),
        }
    }
}

impl CropShape {
    pub fn custom(width: f64, height: f64) -> Self {
        CropShape::Custom {
            size: Size::new(width, height),
        }
    }

    /// Crop window size for this shape.
    pub fn size(&self, sizes: &ShapeSizes) -> Size {
        match self {
            CropShape::Circle => sizes.circle,
            CropShape::Square => sizes.square,
            CropShape::Rectangle => sizes.rectangle,
            CropShape::Custom { size } => *size,
        }
    }

    /// Human readable label for option lists.
    pub fn display_name(&self) -> String {
        match self {
            CropShape::Circle => "Circle".to_string(),
            CropShape::Square => "Square".to_string(),
            CropShape::Rectangle => "Rectangle".to_string(),
            CropShape::Custom { size } => {
                format!("Custom {}X{}", size.width as i64, size.height as i64)
            }
        }
    }

    pub fn clip_mask(&self) -> ClipMask {
        match self {
            CropShape::Circle => ClipMask::Ellipse,
            _ => ClipMask::None,
        }
    }
}

/// The option list offered when no caller list is supplied.
pub fn default_options() -> Vec<CropShape> {
    vec![
        CropShape::Circle,
        CropShape::Square,
        CropShape::Rectangle,
        CropShape::custom(200.0, 200.0),
    ]
}
