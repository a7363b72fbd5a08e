//! Box means over summed-area tables, and the guided filter built on them.

use crate::buffer::Plane;
use crate::error::{ensure_positive, RestoreError};
use crate::parallel::build_rows;

/// Mean over the `(2r + 1) x (2r + 1)` window around each sample.
///
/// The window is clipped to the image and the mean divides by the number of
/// samples actually covered. Sums come from a summed-area table in `f64`, so
/// cost does not depend on `radius`.
pub fn box_mean(plane: &Plane, radius: usize) -> Plane {
    let (width, height) = (plane.width(), plane.height());
    let src = plane.as_slice();

    let stride = width + 1;
    let mut integral = vec![0.0f64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0.0f64;
        for x in 0..width {
            row_sum += src[y * width + x] as f64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let data = build_rows(width, height, |y, row| {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(height);
        for (x, out) in row.iter_mut().enumerate() {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(width);
            let sum = integral[y1 * stride + x1] - integral[y0 * stride + x1]
                - integral[y1 * stride + x0]
                + integral[y0 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            *out = (sum / count) as f32;
        }
    });

    Plane::from_raw(width, height, data)
}

/// Edge-aware smoothing of `input` steered by the edges of `guide`.
///
/// Fits `q = a * guide + b` in every window, then averages the coefficients
/// of all windows covering a sample. `eps` regularizes the fit: larger values
/// smooth more and follow guide edges less.
///
/// # Errors
/// [`RestoreError::DimensionMismatch`] when the planes differ in size,
/// [`RestoreError::InvalidParameter`] when `eps` is not finite and > 0.
pub fn guided_filter(
    guide: &Plane,
    input: &Plane,
    radius: usize,
    eps: f32,
) -> Result<Plane, RestoreError> {
    ensure_positive("guided_eps", eps)?;
    if guide.as_slice().len() != input.as_slice().len() || guide.width() != input.width() {
        return Err(RestoreError::DimensionMismatch {
            expected: guide.as_slice().len(),
            actual: input.as_slice().len(),
        });
    }

    let mean_g = box_mean(guide, radius);
    let mean_p = box_mean(input, radius);
    let corr_gp = box_mean(&guide.zip_map(input, |g, p| g * p), radius);
    let corr_gg = box_mean(&guide.map(|g| g * g), radius);

    let cov_gp = corr_gp.zip_map(&mean_g.zip_map(&mean_p, |g, p| g * p), |c, m| c - m);
    let var_g = corr_gg.zip_map(&mean_g, |c, m| c - m * m);

    let a = cov_gp.zip_map(&var_g, |cov, var| cov / (var + eps));
    let b = mean_p.zip_map(&a.zip_map(&mean_g, |a, g| a * g), |p, ag| p - ag);

    let mean_a = box_mean(&a, radius);
    let mean_b = box_mean(&b, radius);

    Ok(mean_a
        .zip_map(guide, |a, g| a * g)
        .zip_map(&mean_b, |ag, b| ag + b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Plane {
        let data = (0..width * height)
            .map(|i| (i % width) as f32 / width as f32)
            .collect();
        Plane::new(width, height, data).unwrap()
    }

    #[test]
    fn test_box_mean_of_constant() {
        let plane = Plane::new(6, 4, vec![0.25; 24]).unwrap();
        let out = box_mean(&plane, 3);
        assert!(out.as_slice().iter().all(|v| (v - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_box_mean_clips_window() {
        let plane = Plane::new(3, 1, vec![0.0, 3.0, 6.0]).unwrap();
        let out = box_mean(&plane, 1);
        assert!((out.get(0, 0) - 1.5).abs() < 1e-6);
        assert!((out.get(1, 0) - 3.0).abs() < 1e-6);
        assert!((out.get(2, 0) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_mean_radius_zero_is_identity() {
        let plane = ramp(5, 3);
        let out = box_mean(&plane, 0);
        for (a, b) in out.as_slice().iter().zip(plane.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_guided_filter_of_guide_itself_is_close() {
        // With a tiny eps the guide reproduces itself.
        let guide = ramp(20, 10);
        let out = guided_filter(&guide, &guide, 2, 1e-6).unwrap();
        for (a, b) in out.as_slice().iter().zip(guide.as_slice()) {
            assert!((a - b).abs() < 1e-2);
        }
    }

    #[test]
    fn test_guided_filter_keeps_constant_input() {
        let guide = ramp(16, 16);
        let input = Plane::new(16, 16, vec![0.6; 256]).unwrap();
        let out = guided_filter(&guide, &input, 4, 1e-3).unwrap();
        assert!(out.as_slice().iter().all(|v| (v - 0.6).abs() < 1e-4));
    }

    #[test]
    fn test_guided_filter_follows_guide_edge() {
        // A blocky input next to a sharp guide edge gets pulled onto the edge.
        let width = 30;
        let guide_data: Vec<f32> = (0..width * 4)
            .map(|i| if i % width < 15 { 0.0 } else { 1.0 })
            .collect();
        let input_data: Vec<f32> = (0..width * 4)
            .map(|i| if i % width < 12 { 0.2 } else { 0.9 })
            .collect();
        let guide = Plane::new(width, 4, guide_data).unwrap();
        let input = Plane::new(width, 4, input_data).unwrap();
        let out = guided_filter(&guide, &input, 5, 1e-3).unwrap();
        let blurred = box_mean(&input, 5);
        let guided_jump = out.get(15, 1) - out.get(14, 1);
        let box_jump = blurred.get(15, 1) - blurred.get(14, 1);
        assert!(guided_jump > 3.0 * box_jump, "{guided_jump} vs {box_jump}");
    }

    #[test]
    fn test_guided_filter_rejects_mismatch() {
        let a = ramp(4, 4);
        let b = ramp(2, 8);
        assert!(matches!(
            guided_filter(&a, &b, 1, 1e-3),
            Err(RestoreError::DimensionMismatch { .. })
        ));
        assert!(guided_filter(&a, &a, 1, 0.0).is_err());
    }
}
