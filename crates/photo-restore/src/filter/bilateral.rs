//! Edge-preserving bilateral smoothing.

use crate::buffer::{saturate_u8, PixelBuffer, CHANNELS};
use crate::error::{ensure_odd_window, ensure_positive, RestoreError};
use crate::parallel::build_rows;

use super::border::reflect_101;

/// Largest possible sum of absolute channel differences between two pixels.
const MAX_COLOR_DISTANCE: usize = 255 * CHANNELS;

/// Bilateral filter over a circular neighborhood.
///
/// Each output pixel is a weighted mean of the neighbors within
/// `diameter / 2` pixels. A neighbor's weight falls off with its distance
/// (`sigma_space`) and with its color difference to the center
/// (`sigma_color`), measured as the sum of absolute channel differences.
/// Strong edges therefore keep their contrast while flat noisy areas blur.
///
/// # Errors
/// [`RestoreError::InvalidParameter`] for an even or zero diameter or a
/// sigma that is not finite and > 0.
pub fn bilateral_filter(
    buffer: &PixelBuffer,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Result<PixelBuffer, RestoreError> {
    ensure_odd_window("bilateral_diameter", diameter)?;
    ensure_positive("bilateral_sigma_color", sigma_color)?;
    ensure_positive("bilateral_sigma_space", sigma_space)?;

    let (width, height) = buffer.dimensions();
    let src = buffer.as_bytes();
    let radius = (diameter / 2) as isize;

    let space_coeff = -0.5 / (sigma_space as f64 * sigma_space as f64);
    let mut taps: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f64;
            if r2.sqrt() > radius as f64 {
                continue;
            }
            taps.push((dx, dy, (r2 * space_coeff).exp() as f32));
        }
    }

    let color_coeff = -0.5 / (sigma_color as f64 * sigma_color as f64);
    let color_weight: Vec<f32> = (0..=MAX_COLOR_DISTANCE)
        .map(|d| ((d * d) as f64 * color_coeff).exp() as f32)
        .collect();

    let data = build_rows(width * CHANNELS, height, |y, row| {
        for x in 0..width {
            let center = (y * width + x) * CHANNELS;
            let c = &src[center..center + CHANNELS];

            let mut acc = [0.0f32; CHANNELS];
            let mut total = 0.0f32;
            for &(dx, dy, ws) in &taps {
                let sx = reflect_101(x as isize + dx, width);
                let sy = reflect_101(y as isize + dy, height);
                let n = (sy * width + sx) * CHANNELS;
                let p = &src[n..n + CHANNELS];

                let dist: usize = (0..CHANNELS)
                    .map(|k| (p[k] as i32 - c[k] as i32).unsigned_abs() as usize)
                    .sum();
                let w = ws * color_weight[dist];
                for k in 0..CHANNELS {
                    acc[k] += w * p[k] as f32;
                }
                total += w;
            }

            let out = &mut row[x * CHANNELS..(x + 1) * CHANNELS];
            for k in 0..CHANNELS {
                out[k] = saturate_u8(acc[k] / total);
            }
        }
    });

    Ok(PixelBuffer::from_raw(width, height, data))
}
