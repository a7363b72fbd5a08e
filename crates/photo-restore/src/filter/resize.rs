//! Bilinear resampling and the downscale guard.

use crate::buffer::{saturate_u8, PixelBuffer, CHANNELS};
use crate::error::RestoreError;
use crate::parallel::build_rows;

/// Source coordinate and blend weight for one destination index.
#[derive(Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let lo = (s.floor() as usize).min(src_len - 1);
            let hi = (lo + 1).min(src_len - 1);
            Tap {
                lo,
                hi,
                frac: s - lo as f32,
            }
        })
        .collect()
}

/// Resize with bilinear interpolation, sampling at pixel centers.
///
/// # Errors
/// [`RestoreError::EmptyImage`] when either target dimension is zero.
pub fn resize_bilinear(
    buffer: &PixelBuffer,
    width: usize,
    height: usize,
) -> Result<PixelBuffer, RestoreError> {
    if width == 0 || height == 0 {
        return Err(RestoreError::EmptyImage);
    }
    if (width, height) == buffer.dimensions() {
        return Ok(buffer.clone());
    }

    let (src_w, src_h) = buffer.dimensions();
    let src = buffer.as_bytes();
    let xs = taps(src_w, width);
    let ys = taps(src_h, height);

    let data = build_rows(width * CHANNELS, height, |y, row| {
        let ty = ys[y];
        let top = &src[ty.lo * src_w * CHANNELS..(ty.lo + 1) * src_w * CHANNELS];
        let bottom = &src[ty.hi * src_w * CHANNELS..(ty.hi + 1) * src_w * CHANNELS];
        for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let tx = xs[x];
            for c in 0..CHANNELS {
                let sample = |line: &[u8]| {
                    let a = line[tx.lo * CHANNELS + c] as f32;
                    let b = line[tx.hi * CHANNELS + c] as f32;
                    a + (b - a) * tx.frac
                };
                let t = sample(top);
                let b = sample(bottom);
                out[c] = saturate_u8(t + (b - t) * ty.frac);
            }
        }
    });

    Ok(PixelBuffer::from_raw(width, height, data))
}

/// Target size when the longer side must not exceed `max_dimension`.
///
/// Returns `None` when the image already fits. Otherwise both sides are
/// scaled by `max_dimension / longer_side` and truncated (never below 1).
pub fn fit_dimensions(width: usize, height: usize, max_dimension: usize) -> Option<(usize, usize)> {
    let longest = width.max(height);
    if longest <= max_dimension {
        return None;
    }
    let scale = max_dimension as f64 / longest as f64;
    let w = ((width as f64 * scale) as usize).max(1);
    let h = ((height as f64 * scale) as usize).max(1);
    Some((w, h))
}

/// Downscale so the longer side is at most `max_dimension`, keeping aspect.
pub fn fit_within(buffer: &PixelBuffer, max_dimension: usize) -> Result<PixelBuffer, RestoreError> {
    if max_dimension == 0 {
        return Err(RestoreError::invalid(
            "max_dimension",
            0.0,
            "must be at least 1",
        ));
    }
    match fit_dimensions(buffer.width(), buffer.height(), max_dimension) {
        Some((w, h)) => resize_bilinear(buffer, w, h),
        None => Ok(buffer.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fit_dimensions() {
        assert_eq!(fit_dimensions(2000, 1000, 1500), Some((1500, 750)));
        assert_eq!(fit_dimensions(1000, 3000, 1500), Some((500, 1500)));
        assert_eq!(fit_dimensions(1500, 1500, 1500), None);
        assert_eq!(fit_dimensions(1200, 800, 1500), None);
        assert_eq!(fit_dimensions(4000, 1, 1500), Some((1500, 1)));
    }

    #[test]
    fn test_resize_flat_stays_flat() {
        let flat = PixelBuffer::filled(30, 20, [10, 20, 30]).unwrap();
        let out = resize_bilinear(&flat, 12, 7).unwrap();
        assert_eq!(out.dimensions(), (12, 7));
        assert!(out.pixels().all(|p| p == [10, 20, 30]));
    }

    #[test]
    fn test_halving_averages_pairs() {
        let stripes =
            PixelBuffer::from_fn(4, 2, |x, _| if x % 2 == 0 { [0; 3] } else { [100; 3] }).unwrap();
        let out = resize_bilinear(&stripes, 2, 1).unwrap();
        assert_eq!(out.pixel(0, 0), [50; 3]);
        assert_eq!(out.pixel(1, 0), [50; 3]);
    }

    #[test]
    fn test_upscale_clamps_at_edges() {
        let two =
            PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [0; 3] } else { [200; 3] }).unwrap();
        let out = resize_bilinear(&two, 4, 1).unwrap();
        assert_eq!(out.pixel(0, 0), [0; 3]);
        assert_eq!(out.pixel(1, 0), [50; 3]);
        assert_eq!(out.pixel(2, 0), [150; 3]);
        assert_eq!(out.pixel(3, 0), [200; 3]);
    }

    #[test]
    fn test_fit_within_leaves_small_images_alone() {
        let small = PixelBuffer::from_fn(5, 3, |x, y| [x as u8, y as u8, 0]).unwrap();
        assert_eq!(fit_within(&small, 1500).unwrap(), small);
        assert!(fit_within(&small, 0).is_err());
        assert!(resize_bilinear(&small, 0, 3).is_err());
    }
}
