//! Tuning constants for the three enhancers.
//!
//! Every constant lives here as a named default with a builder setter, so a
//! deployment can override a value (the server reads overrides from YAML)
//! without touching the algorithms. The defaults reproduce the reference
//! visual behavior and are empirical, not derived.

use crate::error::{ensure_non_negative, ensure_odd_window, ensure_positive, RestoreError};
use crate::filter::NlmParams;
use crate::policy::StepPolicy;

/// Longest side allowed before low-light processing downscales.
pub const DEFAULT_MAX_DIMENSION: usize = 1500;
pub const DEFAULT_CLAHE_CLIP_LIMIT: f32 = 3.5;
pub const DEFAULT_CLAHE_TILES: usize = 8;
pub const DEFAULT_LOW_LIGHT_SHARPEN: f32 = 0.4;

pub const DEFAULT_DARK_CHANNEL_PATCH: usize = 15;
/// Share of pixels (by dark-channel value) averaged into the atmospheric light.
pub const DEFAULT_ATMOSPHERE_FRACTION: f32 = 0.001;
/// Haze kept on purpose; 1.0 would remove all of it.
pub const DEFAULT_OMEGA: f32 = 0.95;
pub const DEFAULT_TRANSMISSION_EPSILON: f32 = 1e-6;
pub const DEFAULT_GUIDED_RADIUS: usize = 40;
pub const DEFAULT_GUIDED_EPS: f32 = 1e-3;
pub const DEFAULT_MIN_TRANSMISSION: f32 = 0.2;
pub const DEFAULT_FOG_SHARPEN: f32 = 0.5;

pub const DEFAULT_BILATERAL_DIAMETER: usize = 9;
pub const DEFAULT_BILATERAL_SIGMA_COLOR: f32 = 75.0;
pub const DEFAULT_BILATERAL_SIGMA_SPACE: f32 = 75.0;
pub const DEFAULT_NLM_H_LUMA: f32 = 8.0;
pub const DEFAULT_NLM_H_CHROMA: f32 = 8.0;
pub const DEFAULT_NLM_TEMPLATE: usize = 7;
pub const DEFAULT_NLM_SEARCH: usize = 21;
pub const DEFAULT_SMOKE_SHARPEN: f32 = 0.3;

/// Low-light enhancement settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LowLightOptions {
    /// Longest side after the downscale guard.
    pub max_dimension: usize,
    /// CLAHE clip limit relative to a uniform histogram.
    pub clahe_clip_limit: f32,
    /// CLAHE grid is `clahe_tiles x clahe_tiles`.
    pub clahe_tiles: usize,
    /// Gamma chosen from the mean gray level after CLAHE.
    pub gamma_policy: StepPolicy,
    pub sharpen_strength: f32,
}

impl Default for LowLightOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            clahe_clip_limit: DEFAULT_CLAHE_CLIP_LIMIT,
            clahe_tiles: DEFAULT_CLAHE_TILES,
            gamma_policy: StepPolicy::low_light_gamma(),
            sharpen_strength: DEFAULT_LOW_LIGHT_SHARPEN,
        }
    }
}

impl LowLightOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn max_dimension(mut self, pixels: usize) -> Self {
        self.max_dimension = pixels;
        self
    }

    #[inline]
    pub fn clahe(mut self, clip_limit: f32, tiles: usize) -> Self {
        self.clahe_clip_limit = clip_limit;
        self.clahe_tiles = tiles;
        self
    }

    #[inline]
    pub fn gamma_policy(mut self, policy: StepPolicy) -> Self {
        self.gamma_policy = policy;
        self
    }

    #[inline]
    pub fn sharpen_strength(mut self, strength: f32) -> Self {
        self.sharpen_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<(), RestoreError> {
        if self.max_dimension == 0 {
            return Err(RestoreError::invalid(
                "max_dimension",
                0.0,
                "must be at least 1",
            ));
        }
        ensure_positive("clahe_clip_limit", self.clahe_clip_limit)?;
        if self.clahe_tiles == 0 {
            return Err(RestoreError::invalid(
                "clahe_tiles",
                0.0,
                "tile grid must be at least 1x1",
            ));
        }
        for gamma in self.gamma_policy.values() {
            ensure_positive("gamma", gamma)?;
        }
        ensure_non_negative("sharpen_strength", self.sharpen_strength)
    }
}

/// Dark-channel-prior dehazing settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HazeOptions {
    /// Side of the square dark-channel window (odd).
    pub patch_size: usize,
    /// Fraction of pixels used for the atmospheric light, in (0, 1].
    pub atmosphere_fraction: f32,
    /// Haze removal amount, in [0, 1].
    pub omega: f32,
    /// Added to the atmospheric light before dividing.
    pub epsilon: f32,
    pub guided_radius: usize,
    pub guided_eps: f32,
    /// Lower bound for the refined transmission, in (0, 1].
    pub min_transmission: f32,
    pub sharpen_strength: f32,
}

impl Default for HazeOptions {
    fn default() -> Self {
        Self {
            patch_size: DEFAULT_DARK_CHANNEL_PATCH,
            atmosphere_fraction: DEFAULT_ATMOSPHERE_FRACTION,
            omega: DEFAULT_OMEGA,
            epsilon: DEFAULT_TRANSMISSION_EPSILON,
            guided_radius: DEFAULT_GUIDED_RADIUS,
            guided_eps: DEFAULT_GUIDED_EPS,
            min_transmission: DEFAULT_MIN_TRANSMISSION,
            sharpen_strength: DEFAULT_FOG_SHARPEN,
        }
    }
}

impl HazeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn patch_size(mut self, size: usize) -> Self {
        self.patch_size = size;
        self
    }

    #[inline]
    pub fn atmosphere_fraction(mut self, fraction: f32) -> Self {
        self.atmosphere_fraction = fraction;
        self
    }

    #[inline]
    pub fn omega(mut self, omega: f32) -> Self {
        self.omega = omega;
        self
    }

    #[inline]
    pub fn guided(mut self, radius: usize, eps: f32) -> Self {
        self.guided_radius = radius;
        self.guided_eps = eps;
        self
    }

    #[inline]
    pub fn min_transmission(mut self, bound: f32) -> Self {
        self.min_transmission = bound;
        self
    }

    #[inline]
    pub fn sharpen_strength(mut self, strength: f32) -> Self {
        self.sharpen_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<(), RestoreError> {
        ensure_odd_window("patch_size", self.patch_size)?;
        let f = self.atmosphere_fraction;
        if !(f.is_finite() && f > 0.0 && f <= 1.0) {
            return Err(RestoreError::invalid(
                "atmosphere_fraction",
                f,
                "must be in (0, 1]",
            ));
        }
        if !(self.omega.is_finite() && (0.0..=1.0).contains(&self.omega)) {
            return Err(RestoreError::invalid("omega", self.omega, "must be in [0, 1]"));
        }
        ensure_positive("epsilon", self.epsilon)?;
        ensure_positive("guided_eps", self.guided_eps)?;
        let t = self.min_transmission;
        if !(t.is_finite() && t > 0.0 && t <= 1.0) {
            return Err(RestoreError::invalid(
                "min_transmission",
                t,
                "must be in (0, 1]",
            ));
        }
        ensure_non_negative("sharpen_strength", self.sharpen_strength)
    }
}

/// Smoke and sensor-noise reduction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeOptions {
    pub bilateral_diameter: usize,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_space: f32,
    pub nlm: NlmParams,
    pub sharpen_strength: f32,
}

impl Default for SmokeOptions {
    fn default() -> Self {
        Self {
            bilateral_diameter: DEFAULT_BILATERAL_DIAMETER,
            bilateral_sigma_color: DEFAULT_BILATERAL_SIGMA_COLOR,
            bilateral_sigma_space: DEFAULT_BILATERAL_SIGMA_SPACE,
            nlm: NlmParams {
                h_luma: DEFAULT_NLM_H_LUMA,
                h_chroma: DEFAULT_NLM_H_CHROMA,
                template_size: DEFAULT_NLM_TEMPLATE,
                search_size: DEFAULT_NLM_SEARCH,
            },
            sharpen_strength: DEFAULT_SMOKE_SHARPEN,
        }
    }
}

impl SmokeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bilateral(mut self, diameter: usize, sigma_color: f32, sigma_space: f32) -> Self {
        self.bilateral_diameter = diameter;
        self.bilateral_sigma_color = sigma_color;
        self.bilateral_sigma_space = sigma_space;
        self
    }

    #[inline]
    pub fn nlm(mut self, params: NlmParams) -> Self {
        self.nlm = params;
        self
    }

    #[inline]
    pub fn sharpen_strength(mut self, strength: f32) -> Self {
        self.sharpen_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<(), RestoreError> {
        ensure_odd_window("bilateral_diameter", self.bilateral_diameter)?;
        ensure_positive("bilateral_sigma_color", self.bilateral_sigma_color)?;
        ensure_positive("bilateral_sigma_space", self.bilateral_sigma_space)?;
        self.nlm.validate()?;
        ensure_non_negative("sharpen_strength", self.sharpen_strength)
    }
}

/// Settings for all three enhancers.
///
/// # Example
///
/// ```
/// use photo_restore::{HazeOptions, RestoreOptions};
///
/// let options = RestoreOptions::new().haze(HazeOptions::new().min_transmission(0.3));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreOptions {
    pub low_light: LowLightOptions,
    pub haze: HazeOptions,
    pub smoke: SmokeOptions,
}

impl RestoreOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn low_light(mut self, options: LowLightOptions) -> Self {
        self.low_light = options;
        self
    }

    #[inline]
    pub fn haze(mut self, options: HazeOptions) -> Self {
        self.haze = options;
        self
    }

    #[inline]
    pub fn smoke(mut self, options: SmokeOptions) -> Self {
        self.smoke = options;
        self
    }

    /// Check every setting before any pixel work is done.
    pub fn validate(&self) -> Result<(), RestoreError> {
        self.low_light.validate()?;
        self.haze.validate()?;
        self.smoke.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RestoreOptions::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let opts = RestoreOptions::default();
        assert_eq!(opts.low_light.max_dimension, 1500);
        assert_eq!(opts.low_light.clahe_clip_limit, 3.5);
        assert_eq!(opts.low_light.clahe_tiles, 8);
        assert_eq!(opts.low_light.sharpen_strength, 0.4);
        assert_eq!(opts.haze.patch_size, 15);
        assert_eq!(opts.haze.guided_radius, 40);
        assert_eq!(opts.haze.min_transmission, 0.2);
        assert_eq!(opts.haze.sharpen_strength, 0.5);
        assert_eq!(opts.smoke.bilateral_diameter, 9);
        assert_eq!(opts.smoke.nlm.search_size, 21);
        assert_eq!(opts.smoke.sharpen_strength, 0.3);
    }

    #[test]
    fn test_builder_chain() {
        let opts = RestoreOptions::new()
            .low_light(LowLightOptions::new().clahe(2.0, 4).max_dimension(800))
            .smoke(SmokeOptions::new().bilateral(5, 30.0, 10.0));
        assert_eq!(opts.low_light.clahe_tiles, 4);
        assert_eq!(opts.low_light.max_dimension, 800);
        assert_eq!(opts.smoke.bilateral_diameter, 5);
        assert_eq!(opts.haze, HazeOptions::default());
    }

    #[test]
    fn test_validation_names_the_parameter() {
        let opts = RestoreOptions::new().haze(HazeOptions::new().min_transmission(0.0));
        match opts.validate() {
            Err(RestoreError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "min_transmission")
            }
            other => panic!("expected invalid parameter, got {other:?}"),
        }

        let opts = RestoreOptions::new().haze(HazeOptions::new().omega(1.5));
        assert!(opts.validate().is_err());

        let opts = RestoreOptions::new().haze(HazeOptions::new().atmosphere_fraction(0.0));
        assert!(opts.validate().is_err());

        let bad_gamma = StepPolicy::new(vec![(60.0, 0.0)], 1.2).unwrap();
        let opts = RestoreOptions::new().low_light(LowLightOptions::new().gamma_policy(bad_gamma));
        assert!(opts.validate().is_err());

        let opts = RestoreOptions::new().smoke(SmokeOptions::new().sharpen_strength(-1.0));
        assert!(opts.validate().is_err());
    }
}
