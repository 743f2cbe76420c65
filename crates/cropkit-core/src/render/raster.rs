//! Rasterizing the visible crop window into an output bitmap.
//!
//! The preview draws the source aspect-filled into the crop window, scaled
//! about its centre and moved by the committed offset. Rendering repeats
//! that geometry at the output resolution: output pixel `(px, py)` maps to
//! crop window point `((px + 0.5) * W / out_w, (py + 0.5) * H / out_h)`, and
//! from there through the image rectangle into source pixels. Since the
//! mapping is axis aligned, source positions are computed once per column
//! and once per row.

use super::sample::{sample, InterpolationFilter};
use super::RenderError;
use crate::decode::{buffer_len, Bitmap, CHANNELS};
use crate::geometry::{fill_size, ImageRect, Placement, Size};
use crate::shape::ClipMask;
use crate::transform::COVERAGE_TOLERANCE;

/// How the output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub filter: InterpolationFilter,
    /// Pixels outside this mask become fully transparent.
    pub mask: ClipMask,
}

/// Render what is visible through the crop window at `output_width` x `output_height`.
///
/// # Arguments
///
/// * `source` - Decoded source bitmap, read only
/// * `placement` - Committed offset/scale of the image
/// * `window` - Crop window size in display points
/// * `output_width`, `output_height` - Output size in pixels
/// * `options` - Filter and clip mask
///
/// # Errors
///
/// - `RenderError::InvalidOutputSize` if either output dimension is zero or
///   the output buffer size overflows
/// - `RenderError::InvalidWindow` if the window has no area
/// - `RenderError::SourceUnreadable` if the source buffer is empty or malformed
/// - `RenderError::Inconsistent` if the placement leaves part of the window uncovered
///
/// Rendering is deterministic: equal inputs give byte-identical output.
pub fn render(
    source: &Bitmap,
    placement: Placement,
    window: Size,
    output_width: u32,
    output_height: u32,
    options: RenderOptions,
) -> Result<Bitmap, RenderError> {
    let output_len = buffer_len(output_width, output_height)
        .filter(|&len| len > 0)
        .ok_or(RenderError::InvalidOutputSize {
            width: output_width,
            height: output_height,
        })?;
    if !window.has_positive_area() {
        return Err(RenderError::InvalidWindow {
            width: window.width,
            height: window.height,
        });
    }
    if !source.is_readable() {
        return Err(RenderError::SourceUnreadable(format!(
            "{}x{} bitmap with {} bytes",
            source.width,
            source.height,
            source.pixels.len()
        )));
    }

    let (xs, ys) = sample_positions(source, placement, window, output_width, output_height)?;

    let mut output = vec![0u8; output_len];
    let (out_w, out_h) = (output_width as f64, output_height as f64);

    for (py, &sy) in ys.iter().enumerate() {
        let row = py * output_width as usize * CHANNELS;
        for (px, &sx) in xs.iter().enumerate() {
            if !options
                .mask
                .contains(px as f64 + 0.5, py as f64 + 0.5, out_w, out_h)
            {
                // Left as transparent black
                continue;
            }
            let pixel = sample(source, sx, sy, options.filter);
            let idx = row + px * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    Ok(Bitmap::new(output_width, output_height, output))
}

/// Index-space source positions for every output column and row.
///
/// Fails with `RenderError::Inconsistent` when the image rectangle does not
/// cover the window, in which case some positions would fall off the source.
pub(crate) fn sample_positions(
    source: &Bitmap,
    placement: Placement,
    window: Size,
    output_width: u32,
    output_height: u32,
) -> Result<(Vec<f64>, Vec<f64>), RenderError> {
    let displayed = fill_size(
        Size::new(source.width as f64, source.height as f64),
        window,
    );
    let rect = placement.image_rect(displayed, window);

    if !placement.scale.is_finite() || !rect.covers(window, COVERAGE_TOLERANCE) {
        return Err(inconsistency(rect, window));
    }

    let xs = axis_positions(
        output_width,
        window.width,
        rect.min_x,
        rect.width(),
        source.width,
    );
    let ys = axis_positions(
        output_height,
        window.height,
        rect.min_y,
        rect.height(),
        source.height,
    );
    Ok((xs, ys))
}

fn axis_positions(
    output_len: u32,
    window_extent: f64,
    image_min: f64,
    image_extent: f64,
    source_len: u32,
) -> Vec<f64> {
    let window_step = window_extent / output_len as f64;
    let source_per_point = source_len as f64 / image_extent;
    (0..output_len)
        .map(|i| {
            let window_pos = (i as f64 + 0.5) * window_step;
            (window_pos - image_min) * source_per_point - 0.5
        })
        .collect()
}

fn inconsistency(rect: ImageRect, window: Size) -> RenderError {
    RenderError::Inconsistent {
        detail: format!(
            "image rect ({:.3}, {:.3})-({:.3}, {:.3}) does not cover {}x{} window",
            rect.min_x, rect.min_y, rect.max_x, rect.max_y, window.width, window.height
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Offset;

    const WINDOW: Size = Size::new(100.0, 100.0);

    /// Left half red, right half blue.
    fn halves(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        Bitmap::new(width, height, pixels)
    }

    /// Each pixel encodes its own position.
    fn positional(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    fn render_plain(
        src: &Bitmap,
        placement: Placement,
        window: Size,
        width: u32,
        height: u32,
    ) -> Result<Bitmap, RenderError> {
        render(src, placement, window, width, height, RenderOptions::default())
    }

    #[test]
    fn test_identity_render_copies_source() {
        let src = positional(100, 100);
        let out = render_plain(&src, Placement::IDENTITY, WINDOW, 100, 100).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_zoomed_left_half_is_red() {
        let src = halves(100, 100);
        // 2x, shifted right by the full slack: window shows the left half
        let placement = Placement::new(Offset::new(50.0, 0.0), 2.0);
        let out = render(&src, placement, WINDOW, 40, 40, RenderOptions::default()).unwrap();
        for px in out.pixels.chunks_exact(CHANNELS) {
            assert_eq!(px, &[255, 0, 0, 255]);
        }
    }

    #[test]
    fn test_output_size_is_independent_of_window() {
        let src = positional(640, 480);
        let window = Size::new(300.0, 500.0);
        let out = render_plain(&src, Placement::IDENTITY, window, 600, 1000).unwrap();
        assert_eq!((out.width, out.height), (600, 1000));
        assert_eq!(out.pixels.len(), 600 * 1000 * 4);
    }

    #[test]
    fn test_wide_source_shows_centre() {
        // 200x100 source filled into a square window: the middle 100 columns show
        let src = positional(200, 100);
        let out = render_plain(&src, Placement::IDENTITY, WINDOW, 100, 100).unwrap();
        assert_eq!(out.pixel(0, 0)[0], 50);
        assert_eq!(out.pixel(99, 0)[0], 149);
    }

    #[test]
    fn test_circle_mask_clears_corners() {
        let src = halves(100, 100);
        let options = RenderOptions {
            mask: ClipMask::Ellipse,
            ..Default::default()
        };
        let out = render(&src, Placement::IDENTITY, WINDOW, 100, 100, options).unwrap();
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(99, 99), [0, 0, 0, 0]);
        assert_eq!(out.pixel(25, 50), [255, 0, 0, 255]);
        assert_eq!(out.pixel(75, 50), [0, 0, 255, 255]);
    }

    #[test]
    fn test_zero_output_size_fails() {
        let src = halves(10, 10);
        let err = render_plain(&src, Placement::IDENTITY, WINDOW, 0, 10).unwrap_err();
        assert!(matches!(err, RenderError::InvalidOutputSize { width: 0, height: 10 }));
    }

    #[test]
    fn test_unrepresentable_output_size_fails() {
        let src = halves(10, 10);
        let err = render_plain(&src, Placement::IDENTITY, WINDOW, u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, RenderError::InvalidOutputSize { .. }));
    }

    #[test]
    fn test_unreadable_source_fails() {
        let src = Bitmap::new(10, 10, vec![0; 7]);
        let err = render_plain(&src, Placement::IDENTITY, WINDOW, 10, 10).unwrap_err();
        assert!(matches!(err, RenderError::SourceUnreadable(_)));

        let empty = Bitmap::new(0, 0, vec![]);
        assert!(render_plain(&empty, Placement::IDENTITY, WINDOW, 10, 10).is_err());
    }

    #[test]
    fn test_uncovered_window_is_inconsistent() {
        let src = halves(100, 100);
        let placement = Placement::new(Offset::new(50.0, 0.0), 1.0);
        let err = render(&src, placement, WINDOW, 10, 10, RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Inconsistent { .. }));
    }

    #[test]
    fn test_invalid_window_fails() {
        let src = halves(10, 10);
        let window = Size::new(0.0, 10.0);
        let err = render_plain(&src, Placement::IDENTITY, window, 10, 10).unwrap_err();
        assert!(matches!(err, RenderError::InvalidWindow { .. }));
    }

    #[test]
    fn test_render_leaves_source_untouched() {
        let src = positional(50, 50);
        let before = src.clone();
        let placement = Placement::new(Offset::new(-10.0, 10.0), 1.5);
        render(&src, placement, Size::new(50.0, 50.0), 20, 20, RenderOptions::default()).unwrap();
        assert_eq!(src, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
