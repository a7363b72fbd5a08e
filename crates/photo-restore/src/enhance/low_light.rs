//! Low-light and underexposure enhancement.

use crate::buffer::PixelBuffer;
use crate::color::{mean_gray, LabImage};
use crate::error::RestoreError;
use crate::filter::{apply_gamma, clahe, fit_within, sharpen, white_balance};
use crate::options::LowLightOptions;
use crate::policy::StepPolicy;

/// CLAHE on the L\* plane, chroma untouched.
pub fn local_contrast(
    buffer: &PixelBuffer,
    clip_limit: f32,
    tiles: usize,
) -> Result<PixelBuffer, RestoreError> {
    let mut lab = LabImage::from_rgb(buffer);
    lab.l = clahe(&lab.l, lab.width, lab.height, clip_limit, tiles)?;
    Ok(lab.to_rgb())
}

/// Mean gray level of `buffer` and the gamma `policy` picks for it.
pub fn adaptive_gamma(buffer: &PixelBuffer, policy: &StepPolicy) -> (f64, f32) {
    let mean = mean_gray(buffer);
    (mean, policy.value_for(mean))
}

/// Brighten a dark photograph.
///
/// Steps: downscale guard, white balance, CLAHE on lightness, gamma chosen
/// from the resulting mean brightness, light sharpening. The output has the
/// dimensions left by the downscale guard.
pub fn enhance_low_light(
    buffer: &PixelBuffer,
    options: &LowLightOptions,
) -> Result<PixelBuffer, RestoreError> {
    options.validate()?;

    let resized = fit_within(buffer, options.max_dimension)?;
    if resized.dimensions() != buffer.dimensions() {
        tracing::debug!(
            from = ?buffer.dimensions(),
            to = ?resized.dimensions(),
            "Downscaled oversized image"
        );
    }

    let balanced = white_balance(&resized);
    let contrasted = local_contrast(&balanced, options.clahe_clip_limit, options.clahe_tiles)?;

    let (mean, gamma) = adaptive_gamma(&contrasted, &options.gamma_policy);
    tracing::debug!(mean_brightness = mean, gamma, "Selected adaptive gamma");

    let lifted = apply_gamma(&contrasted, gamma)?;
    sharpen(&lifted, options.sharpen_strength)
}
