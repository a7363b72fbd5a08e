//! Luminance histogram equalization ("white balance").

use crate::buffer::PixelBuffer;
use crate::color::LabImage;

use super::histogram::equalize_histogram;

/// Equalize the L\* histogram and keep a\*/b\* untouched.
///
/// Normalizes the global brightness distribution and reduces dull casts
/// without moving hue. A flat image keeps its single lightness level.
pub fn white_balance(buffer: &PixelBuffer) -> PixelBuffer {
    let mut lab = LabImage::from_rgb(buffer);
    lab.l = equalize_histogram(&lab.l);
    lab.to_rgb()
}
