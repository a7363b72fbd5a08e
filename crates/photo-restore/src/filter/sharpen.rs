//! Gaussian blur and unsharp masking.

use crate::buffer::{saturate_u8, PixelBuffer, CHANNELS};
use crate::error::{ensure_non_negative, ensure_positive, RestoreError};
use crate::parallel::build_rows;

use super::border::reflect_101;

/// Blur sigma used by [`sharpen`].
pub const SHARPEN_SIGMA: f32 = 3.0;

/// Normalized 1-D Gaussian kernel with `2 * round(3 * sigma) + 1` taps.
pub fn gaussian_kernel(sigma: f32) -> Result<Vec<f32>, RestoreError> {
    ensure_positive("sigma", sigma)?;
    let radius = (3.0 * sigma).round().max(1.0) as isize;
    let denom = 2.0 * (sigma as f64) * (sigma as f64);

    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    Ok(weights.iter().map(|w| (w / total) as f32).collect())
}

/// Separable convolution of all three channels, result on the 0..=255 scale.
fn convolve_separable(buffer: &PixelBuffer, kernel: &[f32]) -> Vec<f32> {
    let (width, height) = buffer.dimensions();
    let src = buffer.as_bytes();
    let radius = (kernel.len() / 2) as isize;
    let row_len = width * CHANNELS;

    let horizontal: Vec<f32> = build_rows(row_len, height, |y, row| {
        let line = &src[y * row_len..(y + 1) * row_len];
        for x in 0..width {
            let mut acc = [0.0f32; CHANNELS];
            for (k, &w) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, width);
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += w * line[sx * CHANNELS + c] as f32;
                }
            }
            row[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&acc);
        }
    });

    build_rows(row_len, height, |y, row| {
        for (k, &w) in kernel.iter().enumerate() {
            let sy = reflect_101(y as isize + k as isize - radius, height);
            let line = &horizontal[sy * row_len..(sy + 1) * row_len];
            for (dst, &v) in row.iter_mut().zip(line) {
                *dst += w * v;
            }
        }
    })
}

/// Gaussian blur with reflect-101 borders.
pub fn gaussian_blur(buffer: &PixelBuffer, sigma: f32) -> Result<PixelBuffer, RestoreError> {
    let kernel = gaussian_kernel(sigma)?;
    let blurred = convolve_separable(buffer, &kernel);
    let data = blurred.into_iter().map(saturate_u8).collect();
    Ok(PixelBuffer::from_raw(buffer.width(), buffer.height(), data))
}

/// Unsharp mask: `buffer * (1 + strength) - blur(buffer) * strength`.
///
/// The blur uses sigma 3. Strength 0 returns an exact copy; larger values
/// increase edge contrast (and ringing). Results are rounded and clamped.
///
/// # Errors
/// [`RestoreError::InvalidParameter`] when `strength` is negative or not finite.
pub fn sharpen(buffer: &PixelBuffer, strength: f32) -> Result<PixelBuffer, RestoreError> {
    ensure_non_negative("sharpen_strength", strength)?;
    if strength == 0.0 {
        return Ok(buffer.clone());
    }

    let kernel = gaussian_kernel(SHARPEN_SIGMA)?;
    let blurred = convolve_separable(buffer, &kernel);
    let data = buffer
        .as_bytes()
        .iter()
        .zip(blurred)
        .map(|(&v, b)| saturate_u8(v as f32 * (1.0 + strength) - b * strength))
        .collect();
    Ok(PixelBuffer::from_raw(buffer.width(), buffer.height(), data))
}
