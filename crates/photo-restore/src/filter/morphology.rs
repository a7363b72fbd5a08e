//! Grayscale erosion.

use crate::buffer::Plane;
use crate::error::{ensure_odd_window, RestoreError};
use crate::parallel::build_rows;

/// Minimum over a `size x size` square window centered on each sample.
///
/// The window is clipped at the image border, so out-of-range positions never
/// contribute. Runs as two 1-D passes (rows, then columns).
///
/// # Errors
/// [`RestoreError::InvalidParameter`] when `size` is zero or even.
pub fn min_filter(plane: &Plane, size: usize) -> Result<Plane, RestoreError> {
    ensure_odd_window("window", size)?;
    let (width, height) = (plane.width(), plane.height());
    let radius = size / 2;
    let src = plane.as_slice();

    let rows: Vec<f32> = build_rows(width, height, |y, row| {
        let line = &src[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(width - 1);
            *out = line[lo..=hi].iter().copied().fold(f32::INFINITY, f32::min);
        }
    });

    let data = build_rows(width, height, |y, row| {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(height - 1);
        row.fill(f32::INFINITY);
        for sy in lo..=hi {
            let line = &rows[sy * width..(sy + 1) * width];
            for (out, &v) in row.iter_mut().zip(line) {
                *out = out.min(v);
            }
        }
    });

    Ok(Plane::from_raw(width, height, data))
}
