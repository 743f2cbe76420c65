//! Pixel sampling with nearest, bilinear and Lanczos3 interpolation.
//!
//! Sample positions use pixel-centre convention: pixel `i` covers
//! `[i, i + 1)` and has its centre at `i + 0.5`, so continuous coordinate
//! `x` maps to `x - 0.5` in index space. Every tap is clamped to the bitmap,
//! which means a sampler never indexes outside `[0, width) x [0, height)`.

use serde::{Deserialize, Serialize};

use crate::decode::{Bitmap, CHANNELS};

/// Interpolation filter used when resampling the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationFilter {
    /// Nearest neighbour - blocky, fastest.
    Nearest,
    /// Bilinear - good for interactive preview and most exports.
    #[default]
    Bilinear,
    /// Lanczos3 - sharper, considers a 6x6 neighbourhood.
    Lanczos3,
}

/// Sample `image` at index-space position `(x, y)`.
#[inline]
pub(crate) fn sample(image: &Bitmap, x: f64, y: f64, filter: InterpolationFilter) -> [u8; 4] {
    match filter {
        InterpolationFilter::Nearest => sample_nearest(image, x, y),
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
    }
}

#[inline]
fn clamp_index(v: i64, len: u32) -> usize {
    v.clamp(0, len as i64 - 1) as usize
}

/// Get a pixel as [f64; 4], clamping the coordinates to the image.
#[inline]
fn get_pixel_f64(image: &Bitmap, px: i64, py: i64) -> [f64; 4] {
    let x = clamp_index(px, image.width);
    let y = clamp_index(py, image.height);
    let idx = (y * image.width as usize + x) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

fn sample_nearest(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let p = get_pixel_f64(image, x.round() as i64, y.round() as i64);
    [p[0] as u8, p[1] as u8, p[2] as u8, p[3] as u8]
}

/// Bilinear interpolation of the 4 nearest pixels, weighted by distance.
fn sample_bilinear(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let x = x.clamp(0.0, (image.width - 1) as f64);
    let y = y.clamp(0.0, (image.height - 1) as f64);

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos3 over a 6x6 neighbourhood. Edge taps repeat the border pixel.
fn sample_lanczos3(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let x = x.clamp(0.0, (image.width - 1) as f64);
    let y = y.clamp(0.0, (image.height - 1) as f64);
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let wy = lanczos_weight(y - (y0 + ky) as f64, 3.0);
        if wy == 0.0 {
            continue;
        }
        for kx in -2..=3 {
            let weight = lanczos_weight(x - (x0 + kx) as f64, 3.0) * wy;
            let pixel = get_pixel_f64(image, x0 + kx, y0 + ky);
            for c in 0..4 {
                sum[c] += pixel[c] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum.abs() > f64::EPSILON {
        for c in 0..4 {
            result[c] = (sum[c] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }
    result
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
