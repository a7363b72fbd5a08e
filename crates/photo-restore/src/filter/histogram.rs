//! Global and tile-adaptive histogram equalization of 8-bit planes.

use crate::buffer::saturate_u8;
use crate::error::{ensure_positive, RestoreError};
use crate::parallel::build_rows;

use super::border::reflect_101;

const BINS: usize = 256;

/// Count occurrences of each 8-bit level.
pub fn histogram(values: &[u8]) -> [u32; BINS] {
    let mut hist = [0u32; BINS];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Global histogram equalization.
///
/// The darkest occupied level maps to 0 and the cumulative distribution is
/// stretched over 0..=255. A flat plane (one occupied level) has nothing to
/// stretch and is returned unchanged.
pub fn equalize_histogram(values: &[u8]) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }

    let hist = histogram(values);
    let total = values.len() as u64;

    let first = hist.iter().position(|&c| c > 0).unwrap_or(0);
    let first_count = hist[first] as u64;
    if first_count == total {
        return values.to_vec();
    }

    let scale = 255.0 / (total - first_count) as f64;
    let mut lut = [0u8; BINS];
    let mut sum = 0u64;
    for level in (first + 1)..BINS {
        sum += hist[level] as u64;
        lut[level] = (sum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    values.iter().map(|&v| lut[v as usize]).collect()
}

/// Clip bins at `limit` and spread the excess over the whole histogram.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut clipped = 0u32;
    for h in hist.iter_mut() {
        if *h > limit {
            clipped += *h - limit;
            *h = limit;
        }
    }

    let batch = clipped / BINS as u32;
    let mut residual = (clipped - batch * BINS as u32) as usize;
    for h in hist.iter_mut() {
        *h += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Contrast-limited adaptive histogram equalization (CLAHE).
///
/// The plane is divided into a `tiles x tiles` grid (padded by reflection
/// when the size is not a multiple of the grid). Each tile gets its own
/// clipped equalization table; every output sample blends the tables of the
/// four nearest tile centers bilinearly.
///
/// `clip_limit` is relative: a bin may hold at most
/// `clip_limit * tile_pixels / 256` samples (never fewer than 1).
///
/// # Errors
/// [`RestoreError::InvalidParameter`] when `clip_limit` is not > 0 or
/// `tiles` is zero.
pub fn clahe(
    plane: &[u8],
    width: usize,
    height: usize,
    clip_limit: f32,
    tiles: usize,
) -> Result<Vec<u8>, RestoreError> {
    ensure_positive("clahe_clip_limit", clip_limit)?;
    if tiles == 0 {
        return Err(RestoreError::invalid(
            "clahe_tiles",
            0.0,
            "tile grid must be at least 1x1",
        ));
    }
    debug_assert_eq!(plane.len(), width * height);

    let tile_w = width.div_ceil(tiles);
    let tile_h = height.div_ceil(tiles);
    let tile_area = tile_w * tile_h;
    let limit = ((clip_limit as f64 * tile_area as f64 / BINS as f64) as u32).max(1);
    let lut_scale = 255.0 / tile_area as f64;

    let mut luts = vec![[0u8; BINS]; tiles * tiles];
    for ty in 0..tiles {
        for tx in 0..tiles {
            let mut hist = [0u32; BINS];
            for y in (ty * tile_h)..((ty + 1) * tile_h) {
                let sy = reflect_101(y as isize, height);
                for x in (tx * tile_w)..((tx + 1) * tile_w) {
                    let sx = reflect_101(x as isize, width);
                    hist[plane[sy * width + sx] as usize] += 1;
                }
            }

            clip_histogram(&mut hist, limit);

            let lut = &mut luts[ty * tiles + tx];
            let mut sum = 0u64;
            for (level, entry) in lut.iter_mut().enumerate() {
                sum += hist[level] as u64;
                *entry = (sum as f64 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let last = tiles as isize - 1;

    let out = build_rows(width, height, |y, row| {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(last) as usize;
        let ty1 = ty1.max(0) as usize;

        for (x, out) in row.iter_mut().enumerate() {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let tx2 = (tx1 + 1).min(last) as usize;
            let tx1 = tx1.max(0) as usize;

            let v = plane[y * width + x] as usize;
            let top = luts[ty1 * tiles + tx1][v] as f32 * (1.0 - xa)
                + luts[ty1 * tiles + tx2][v] as f32 * xa;
            let bottom = luts[ty2 * tiles + tx1][v] as f32 * (1.0 - xa)
                + luts[ty2 * tiles + tx2][v] as f32 * xa;
            *out = saturate_u8(top * (1.0 - ya) + bottom * ya);
        }
    });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equalize_flat_plane_is_stable() {
        let flat = vec![77u8; 64];
        assert_eq!(equalize_histogram(&flat), flat);
        let black = vec![0u8; 16];
        assert_eq!(equalize_histogram(&black), black);
    }

    #[test]
    fn test_equalize_two_levels_stretches_to_full_range() {
        let values = vec![100, 100, 120, 120];
        assert_eq!(equalize_histogram(&values), vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_equalize_is_monotonic() {
        let values: Vec<u8> = (0..1000).map(|i| ((i * 37) % 180) as u8 + 20).collect();
        let out = equalize_histogram(&values);
        let mut pairs: Vec<(u8, u8)> = values.iter().copied().zip(out.iter().copied()).collect();
        pairs.sort();
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
        assert_eq!(*out.iter().max().unwrap(), 255);
        assert_eq!(*out.iter().min().unwrap(), 0);
    }

    #[test]
    fn test_clip_histogram_respects_total() {
        let mut hist = [0u32; 256];
        hist[0] = 1000;
        hist[1] = 500;
        clip_histogram(&mut hist, 100);
        let total: u32 = hist.iter().sum();
        assert_eq!(total, 1500);
        assert!(hist[0] <= 100 + 1500 / 256 + 1);
    }

    #[test]
    fn test_clahe_uniform_plane_stays_uniform() {
        let plane = vec![128u8; 64 * 64];
        let out = clahe(&plane, 64, 64, 3.5, 8).unwrap();
        let first = out[0];
        assert!(out.iter().all(|&v| v == first));
    }

    #[test]
    fn test_clahe_boosts_local_contrast_in_shadows() {
        // Alternating dark rows 40 / 44: every tile sees the same texture.
        let (w, h) = (128, 128);
        let plane: Vec<u8> = (0..w * h)
            .map(|i| if (i / w) % 2 == 0 { 40 } else { 44 })
            .collect();
        let out = clahe(&plane, w, h, 3.5, 8).unwrap();
        let dark = out[0] as i32;
        let light = out[w] as i32;
        assert!(light - dark > 4, "expected stretched contrast, got {dark}..{light}");
    }

    #[test]
    fn test_clahe_handles_sizes_not_divisible_by_grid() {
        let plane: Vec<u8> = (0..13 * 5).map(|i| (i * 3) as u8).collect();
        let out = clahe(&plane, 13, 5, 3.5, 8).unwrap();
        assert_eq!(out.len(), plane.len());

        let tiny = clahe(&[9u8], 1, 1, 3.5, 8).unwrap();
        assert_eq!(tiny.len(), 1);
    }

    #[test]
    fn test_clahe_rejects_bad_parameters() {
        assert!(clahe(&[0u8; 4], 2, 2, 0.0, 8).is_err());
        assert!(clahe(&[0u8; 4], 2, 2, 3.5, 0).is_err());
    }
}
