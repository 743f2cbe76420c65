//! Rasterizing a committed crop into an output bitmap.
//!
//! The renderer reproduces the preview geometry at the requested output
//! size and refuses, rather than guesses, when the placement does not cover
//! the crop window.

mod raster;
mod sample;

use thiserror::Error;

pub use raster::{render, RenderOptions};
pub use sample::InterpolationFilter;

/// Errors from rendering a crop.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output width or height is zero, or the output buffer would not fit in memory.
    #[error("Invalid output size: {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },

    /// The crop window has no area.
    #[error("Invalid crop window: {width}x{height}")]
    InvalidWindow { width: f64, height: f64 },

    /// The source bitmap is empty or its buffer does not match its dimensions.
    #[error("Source bitmap unreadable: {0}")]
    SourceUnreadable(String),

    /// The placement leaves part of the window uncovered. Clamping should
    /// make this unreachable.
    #[error("Raster inconsistency: {detail}")]
    Inconsistent { detail: String },
}
