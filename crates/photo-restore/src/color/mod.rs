//! Color conversions shared by all enhancers.
//!
//! - [`lab`]: the single RGB <-> CIE L\*a\*b\* routine used by white balance,
//!   CLAHE and non-local means
//! - [`gray`]: luma weights for brightness statistics and the guided filter
//! - `lut`: build-time sRGB transfer tables

pub mod gray;
pub mod lab;
mod lut;

pub use gray::{gray_plane, gray_u8, luma, mean_gray};
pub use lab::{lab8_to_rgb, rgb_to_lab8, LabImage};
