//! Fog and haze removal with the dark channel prior.
//!
//! Haze adds a veil of atmospheric light `A` to every pixel:
//! `I = J * t + A * (1 - t)`, where `J` is the scene and `t` the fraction of
//! scene light that reaches the camera. In haze-free patches at least one
//! channel is close to zero, so the patch minimum (the dark channel) is a
//! direct measure of how much veil was added. The steps below estimate `A`
//! and `t` from it and invert the model.

use std::cmp::Ordering;

use crate::buffer::{FloatBuffer, PixelBuffer, Plane, CHANNELS};
use crate::color::gray_plane;
use crate::error::RestoreError;
use crate::filter::{guided_filter, min_filter, sharpen, white_balance};
use crate::options::HazeOptions;
use crate::parallel::map_samples;

/// Per-call haze model: atmospheric light plus refined transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct HazeEstimate {
    /// Haze color, each component in 0.0..=1.0
    pub atmospheric_light: [f32; 3],
    /// Refined transmission, each value in `min_transmission..=1.0`
    pub transmission: Plane,
}

/// Per-pixel minimum over the three channels.
pub fn min_channel(image: &FloatBuffer) -> Plane {
    let pixels: Vec<&[f32]> = image.as_slice().chunks_exact(CHANNELS).collect();
    let data = map_samples(&pixels, |p| p[0].min(p[1]).min(p[2]));
    Plane::from_raw(image.width(), image.height(), data)
}

/// Dark channel: channel minimum eroded over a `patch_size` square.
pub fn dark_channel(image: &FloatBuffer, patch_size: usize) -> Result<Plane, RestoreError> {
    min_filter(&min_channel(image), patch_size)
}

/// Number of pixels averaged for the atmospheric light.
pub fn atmosphere_sample_count(pixels: usize, fraction: f32) -> usize {
    ((pixels as f64 * fraction as f64) as usize).max(1)
}

/// Mean color of the pixels with the largest dark-channel values.
///
/// Takes the top `max(1, floor(N * fraction))` pixels. Equal dark-channel
/// values are ranked by position (earlier pixels first) so the selection is
/// deterministic.
pub fn estimate_atmospheric_light(image: &FloatBuffer, dark: &Plane, fraction: f32) -> [f32; 3] {
    let values = dark.as_slice();
    let count = atmosphere_sample_count(values.len(), fraction).min(values.len());

    let mut order: Vec<usize> = (0..values.len()).collect();
    let brightest_first = |a: &usize, b: &usize| -> Ordering {
        values[*b].total_cmp(&values[*a]).then(a.cmp(b))
    };
    if count < order.len() {
        order.select_nth_unstable_by(count - 1, brightest_first);
    }

    let mut sum = [0.0f64; 3];
    for &index in &order[..count] {
        let p = image.pixel_at(index);
        for c in 0..CHANNELS {
            sum[c] += p[c] as f64;
        }
    }
    sum.map(|s| ((s / count as f64) as f32).clamp(0.0, 1.0))
}

/// Raw transmission `1 - omega * dark / (max(A) + epsilon)`.
pub fn estimate_transmission(
    dark: &Plane,
    atmospheric_light: [f32; 3],
    omega: f32,
    epsilon: f32,
) -> Plane {
    let a_max = atmospheric_light.iter().copied().fold(0.0f32, f32::max);
    let scale = omega / (a_max + epsilon);
    dark.map(|d| 1.0 - scale * d)
}

/// Guided-filter refinement with the grayscale image as guide, then clamp
/// to `min_transmission..=1.0`.
pub fn refine_transmission(
    image: &FloatBuffer,
    raw: &Plane,
    radius: usize,
    eps: f32,
    min_transmission: f32,
) -> Result<Plane, RestoreError> {
    let guide = gray_plane(image);
    let refined = guided_filter(&guide, raw, radius, eps)?;
    // max() before min() also maps NaN to the lower bound.
    Ok(refined.map(|t| t.max(min_transmission).min(1.0)))
}

/// Invert the haze model: `J = (I - A) / t + A`, clipped to 0.0..=1.0.
pub fn recover_radiance(
    image: &FloatBuffer,
    transmission: &Plane,
    atmospheric_light: [f32; 3],
) -> FloatBuffer {
    let t = transmission.as_slice();
    let data = image
        .as_slice()
        .chunks_exact(CHANNELS)
        .zip(t)
        .flat_map(|(p, &t)| {
            let mut out = [0.0f32; CHANNELS];
            for c in 0..CHANNELS {
                let a = atmospheric_light[c];
                out[c] = ((p[c] - a) / t + a).max(0.0).min(1.0);
            }
            out
        })
        .collect();
    FloatBuffer::from_raw(image.width(), image.height(), data)
}

/// Estimate atmospheric light and refined transmission for `image`.
pub fn estimate_haze(
    image: &FloatBuffer,
    options: &HazeOptions,
) -> Result<HazeEstimate, RestoreError> {
    let dark = dark_channel(image, options.patch_size)?;
    let atmospheric_light = estimate_atmospheric_light(image, &dark, options.atmosphere_fraction);
    tracing::debug!(
        r = atmospheric_light[0],
        g = atmospheric_light[1],
        b = atmospheric_light[2],
        "Estimated atmospheric light"
    );

    let raw = estimate_transmission(&dark, atmospheric_light, options.omega, options.epsilon);
    let transmission = refine_transmission(
        image,
        &raw,
        options.guided_radius,
        options.guided_eps,
        options.min_transmission,
    )?;

    Ok(HazeEstimate {
        atmospheric_light,
        transmission,
    })
}

/// Remove fog or haze, then white-balance and sharpen. Size is preserved.
pub fn remove_haze(
    buffer: &PixelBuffer,
    options: &HazeOptions,
) -> Result<PixelBuffer, RestoreError> {
    options.validate()?;

    let image = buffer.to_float();
    let estimate = estimate_haze(&image, options)?;
    let dehazed =
        recover_radiance(&image, &estimate.transmission, estimate.atmospheric_light).to_u8();

    let balanced = white_balance(&dehazed);
    sharpen(&balanced, options.sharpen_strength)
}
