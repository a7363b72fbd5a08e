//! Non-local means denoising of color images.
//!
//! Works in 8-bit L\*a\*b\*: lightness is denoised with its own strength and
//! the two chroma planes share a second one, so color noise can be smoothed
//! harder than luminance detail.
//!
//! For every offset in the search window the squared differences between the
//! image and its shifted copy are box-summed over the template window. That
//! gives the patch distance of every pixel to its partner at that offset in
//! O(1) per pixel, independent of the template size.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::LabImage;
use crate::error::{ensure_odd_window, ensure_positive, RestoreError};
use crate::parallel::build_bands;

use super::border::reflect_101;

/// Rows processed together with one set of scratch buffers.
const BAND_ROWS: usize = 16;

/// Non-local means parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NlmParams {
    /// Filter strength for lightness
    pub h_luma: f32,
    /// Filter strength for the a\*/b\* pair
    pub h_chroma: f32,
    /// Side of the square patch compared between pixels (odd)
    pub template_size: usize,
    /// Side of the square area searched for similar patches (odd)
    pub search_size: usize,
}

impl NlmParams {
    pub fn validate(&self) -> Result<(), RestoreError> {
        ensure_positive("nlm_h_luma", self.h_luma)?;
        ensure_positive("nlm_h_chroma", self.h_chroma)?;
        ensure_odd_window("nlm_template_size", self.template_size)?;
        ensure_odd_window("nlm_search_size", self.search_size)?;
        Ok(())
    }
}

/// Plane padded by `pad` on every side with reflect-101 borders.
struct PaddedPlane {
    stride: usize,
    data: Vec<f32>,
}

impl PaddedPlane {
    fn new(src: &[u8], width: usize, height: usize, pad: usize) -> Self {
        let stride = width + 2 * pad;
        let rows = height + 2 * pad;
        let mut data = Vec::with_capacity(stride * rows);
        for py in 0..rows {
            let sy = reflect_101(py as isize - pad as isize, height);
            for px in 0..stride {
                let sx = reflect_101(px as isize - pad as isize, width);
                data.push(src[sy * width + sx] as f32);
            }
        }
        Self { stride, data }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.stride + x]
    }
}

/// Box sums of `src` (`cols` wide) over `size x size` windows.
///
/// `out` receives `rows` rows of `cols - size + 1` sums. `column` is scratch
/// of at least `cols` entries.
fn box_sums(
    src: &[f32],
    cols: usize,
    rows: usize,
    size: usize,
    column: &mut [f32],
    out: &mut [f32],
) {
    let out_cols = cols - size + 1;
    column[..cols].fill(0.0);
    for r in 0..size {
        for (acc, &v) in column.iter_mut().zip(&src[r * cols..(r + 1) * cols]) {
            *acc += v;
        }
    }

    for r in 0..rows {
        if r > 0 {
            let leave = &src[(r - 1) * cols..r * cols];
            let enter = &src[(r - 1 + size) * cols..(r + size) * cols];
            for c in 0..cols {
                column[c] += enter[c] - leave[c];
            }
        }

        let line = &mut out[r * out_cols..(r + 1) * out_cols];
        let mut sum: f32 = column[..size].iter().sum();
        line[0] = sum.max(0.0);
        for x in 1..out_cols {
            sum += column[x - 1 + size] - column[x - 1];
            line[x] = sum.max(0.0);
        }
    }
}

/// Denoise an RGB image with non-local means.
///
/// A pixel's new value is the weighted mean of every pixel in the search
/// window around it, weighted by `exp(-d / h^2)` where `d` is the mean
/// squared difference between their template patches. The weights for
/// lightness and for chroma are computed separately.
///
/// # Errors
/// [`RestoreError::InvalidParameter`] when a strength is not > 0 or a
/// window size is even or zero.
pub fn denoise_colored(
    buffer: &PixelBuffer,
    params: &NlmParams,
) -> Result<PixelBuffer, RestoreError> {
    params.validate()?;

    let lab = LabImage::from_rgb(buffer);
    let (width, height) = (lab.width, lab.height);
    let t_half = params.template_size / 2;
    let s_half = params.search_size / 2;
    let pad = s_half + t_half;

    let pl = PaddedPlane::new(&lab.l, width, height, pad);
    let pa = PaddedPlane::new(&lab.a, width, height, pad);
    let pb = PaddedPlane::new(&lab.b, width, height, pad);

    let area = (params.template_size * params.template_size) as f32;
    let inv_luma = 1.0 / (area * params.h_luma * params.h_luma);
    let inv_chroma = 1.0 / (area * 2.0 * params.h_chroma * params.h_chroma);

    let interleaved: Vec<f32> = build_bands(width * CHANNELS, height, BAND_ROWS, |y0, band| {
        let rows = band.len() / (width * CHANNELS);
        let diff_cols = width + 2 * t_half;
        let diff_rows = rows + 2 * t_half;

        let mut diff_l = vec![0.0f32; diff_cols * diff_rows];
        let mut diff_ab = vec![0.0f32; diff_cols * diff_rows];
        let mut ssd_l = vec![0.0f32; width * rows];
        let mut ssd_ab = vec![0.0f32; width * rows];
        let mut column = vec![0.0f32; diff_cols];

        let mut weight_l = vec![0.0f32; width * rows];
        let mut weight_ab = vec![0.0f32; width * rows];
        let mut acc = vec![0.0f32; width * rows * CHANNELS];

        let s = s_half as isize;
        for dy in -s..=s {
            for dx in -s..=s {
                // Row r of the diff grid is image row y0 + r - t_half; in the
                // padded planes that is y0 + r + s_half.
                for r in 0..diff_rows {
                    let py = y0 + r + s_half;
                    let qy = (py as isize + dy) as usize;
                    for c in 0..diff_cols {
                        let px = c + s_half;
                        let qx = (px as isize + dx) as usize;
                        let dl = pl.at(px, py) - pl.at(qx, qy);
                        let da = pa.at(px, py) - pa.at(qx, qy);
                        let db = pb.at(px, py) - pb.at(qx, qy);
                        diff_l[r * diff_cols + c] = dl * dl;
                        diff_ab[r * diff_cols + c] = da * da + db * db;
                    }
                }

                box_sums(&diff_l, diff_cols, rows, params.template_size, &mut column, &mut ssd_l);
                box_sums(&diff_ab, diff_cols, rows, params.template_size, &mut column, &mut ssd_ab);

                for r in 0..rows {
                    let qy = (y0 + r + pad) as isize + dy;
                    for x in 0..width {
                        let i = r * width + x;
                        let qx = (x + pad) as isize + dx;
                        let (qx, qy) = (qx as usize, qy as usize);

                        let wl = (-ssd_l[i] * inv_luma).exp();
                        let wab = (-ssd_ab[i] * inv_chroma).exp();
                        weight_l[i] += wl;
                        weight_ab[i] += wab;
                        acc[i * CHANNELS] += wl * pl.at(qx, qy);
                        acc[i * CHANNELS + 1] += wab * pa.at(qx, qy);
                        acc[i * CHANNELS + 2] += wab * pb.at(qx, qy);
                    }
                }
            }
        }

        for (i, out) in band.chunks_exact_mut(CHANNELS).enumerate() {
            out[0] = acc[i * CHANNELS] / weight_l[i];
            out[1] = acc[i * CHANNELS + 1] / weight_ab[i];
            out[2] = acc[i * CHANNELS + 2] / weight_ab[i];
        }
    });

    let quantize = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    let mut denoised = LabImage {
        width,
        height,
        l: Vec::with_capacity(width * height),
        a: Vec::with_capacity(width * height),
        b: Vec::with_capacity(width * height),
    };
    for px in interleaved.chunks_exact(CHANNELS) {
        denoised.l.push(quantize(px[0]));
        denoised.a.push(quantize(px[1]));
        denoised.b.push(quantize(px[2]));
    }

    Ok(denoised.to_rgb())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NlmParams {
        NlmParams {
            h_luma: 8.0,
            h_chroma: 8.0,
            template_size: 7,
            search_size: 21,
        }
    }

    fn small_params() -> NlmParams {
        NlmParams {
            template_size: 3,
            search_size: 7,
            ..params()
        }
    }

    #[test]
    fn test_box_sums() {
        // 4x3 grid of ones, 3x3 windows: every sum is 9.
        let src = vec![1.0f32; 4 * 3];
        let mut column = vec![0.0; 4];
        let mut out = vec![0.0; 2];
        box_sums(&src, 4, 1, 3, &mut column, &mut out);
        assert_eq!(out, vec![9.0, 9.0]);

        let src: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let mut out = vec![0.0; 2];
        box_sums(&src, 4, 1, 3, &mut column, &mut out);
        // window at x=0: rows 0..3, cols 0..3 => 0+1+2+4+5+6+8+9+10
        assert_eq!(out, vec![45.0, 54.0]);
    }

    #[test]
    fn test_flat_image_only_takes_lab_round_trip() {
        let flat = PixelBuffer::filled(12, 9, [120, 90, 60]).unwrap();
        let expected = LabImage::from_rgb(&flat).to_rgb();
        assert_eq!(denoise_colored(&flat, &small_params()).unwrap(), expected);
    }

    #[test]
    fn test_reduces_grain() {
        let noisy = PixelBuffer::from_fn(24, 24, |x, y| {
            let n = ((x * 7 + y * 13) % 5) as u8 * 3;
            [100 + n, 100 + n, 100 + n]
        })
        .unwrap();
        let out = denoise_colored(&noisy, &small_params()).unwrap();

        let variance = |b: &PixelBuffer| {
            let vals: Vec<f64> = b.pixels().map(|p| p[1] as f64).collect();
            let mean = vals.iter().sum::<f64>() / vals.len() as f64;
            vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / vals.len() as f64
        };
        assert!(variance(&out) < variance(&noisy));
    }

    #[test]
    fn test_preserves_strong_edge() {
        let edge =
            PixelBuffer::from_fn(20, 12, |x, _| if x < 10 { [20; 3] } else { [220; 3] }).unwrap();
        let out = denoise_colored(&edge, &small_params()).unwrap();
        assert!(out.pixel(8, 6)[0] < 40);
        assert!(out.pixel(11, 6)[0] > 200);
    }

    #[test]
    fn test_image_smaller_than_search_window() {
        let tiny = PixelBuffer::from_fn(3, 2, |x, y| [(x * 40) as u8, (y * 90) as u8, 10]).unwrap();
        let out = denoise_colored(&tiny, &params()).unwrap();
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let buffer = PixelBuffer::filled(4, 4, [0; 3]).unwrap();
        let bad = NlmParams {
            h_luma: 0.0,
            ..params()
        };
        assert!(denoise_colored(&buffer, &bad).is_err());
        let bad = NlmParams {
            template_size: 6,
            ..params()
        };
        assert!(denoise_colored(&buffer, &bad).is_err());
    }
}
