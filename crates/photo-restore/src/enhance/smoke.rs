//! Smoke and sensor-noise suppression.

use crate::buffer::PixelBuffer;
use crate::error::RestoreError;
use crate::filter::{bilateral_filter, denoise_colored, sharpen, white_balance};
use crate::options::SmokeOptions;

/// White balance, bilateral smoothing, non-local means, then a light sharpen.
/// Size is preserved.
pub fn reduce_smoke(
    buffer: &PixelBuffer,
    options: &SmokeOptions,
) -> Result<PixelBuffer, RestoreError> {
    options.validate()?;

    let balanced = white_balance(buffer);
    let smoothed = bilateral_filter(
        &balanced,
        options.bilateral_diameter,
        options.bilateral_sigma_color,
        options.bilateral_sigma_space,
    )?;
    let denoised = denoise_colored(&smoothed, &options.nlm)?;
    sharpen(&denoised, options.sharpen_strength)
}
