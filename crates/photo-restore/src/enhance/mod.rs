//! The three restoration modes.

pub mod haze;
pub mod low_light;
pub mod smoke;

pub use haze::{
    dark_channel, estimate_atmospheric_light, estimate_haze, estimate_transmission, min_channel,
    recover_radiance, refine_transmission, remove_haze, HazeEstimate,
};
pub use low_light::{adaptive_gamma, enhance_low_light, local_contrast};
pub use smoke::reduce_smoke;
