use photo_restore::filter::NlmParams;
use photo_restore::{
    HazeOptions, LowLightOptions, RestoreError, RestoreOptions, SmokeOptions, StepPolicy,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Root served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Where original uploads are kept (relative to `static_dir`)
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Where processed PNGs are written (relative to `static_dir`)
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,

    /// Largest accepted request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Overrides for the enhancer constants
    #[serde(default)]
    pub tuning: TuningConfig,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_result_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

/// Optional overrides, grouped by enhancer. Anything left out keeps the
/// library default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct TuningConfig {
    #[serde(default)]
    pub low_light: LowLightTuning,
    #[serde(default)]
    pub fog: FogTuning,
    #[serde(default)]
    pub smoke: SmokeTuning,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct LowLightTuning {
    pub max_dimension: Option<usize>,
    pub clahe_clip_limit: Option<f32>,
    pub clahe_tiles: Option<usize>,
    /// Replaces the whole gamma table when set
    pub gamma_steps: Option<Vec<GammaStep>>,
    pub gamma_fallback: Option<f32>,
    pub sharpen_strength: Option<f32>,
}

/// One row of the gamma table: `gamma` applies while mean gray `< below`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct GammaStep {
    pub below: f64,
    pub gamma: f32,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FogTuning {
    pub patch_size: Option<usize>,
    pub atmosphere_fraction: Option<f32>,
    pub omega: Option<f32>,
    pub transmission_epsilon: Option<f32>,
    pub guided_radius: Option<usize>,
    pub guided_eps: Option<f32>,
    pub min_transmission: Option<f32>,
    pub sharpen_strength: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SmokeTuning {
    pub bilateral_diameter: Option<usize>,
    pub bilateral_sigma_color: Option<f32>,
    pub bilateral_sigma_space: Option<f32>,
    pub nlm_h_luma: Option<f32>,
    pub nlm_h_chroma: Option<f32>,
    pub nlm_template_size: Option<usize>,
    pub nlm_search_size: Option<usize>,
    pub sharpen_strength: Option<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            upload_dir: default_upload_dir(),
            result_dir: default_result_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            tuning: TuningConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file set, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML content, falling back to defaults on error.
    pub fn parse(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    static_dir = %config.static_dir.display(),
                    max_upload_bytes = config.max_upload_bytes,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Load using `CONFIG_FILE` and apply the `STATIC_DIR` override.
    pub fn from_env() -> Self {
        let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
        let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
        Self::load(config_file.as_deref()).with_static_dir(static_dir)
    }

    /// Replace `static_dir` when an override is given.
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.static_dir = dir;
        }
        self
    }

    /// Absolute (or cwd-relative) upload directory.
    pub fn upload_path(&self) -> PathBuf {
        self.static_dir.join(&self.upload_dir)
    }

    /// Absolute (or cwd-relative) result directory.
    pub fn result_path(&self) -> PathBuf {
        self.static_dir.join(&self.result_dir)
    }

    /// Build validated enhancer options from the tuning overrides.
    pub fn restore_options(&self) -> Result<RestoreOptions, RestoreError> {
        let options = RestoreOptions::new()
            .low_light(self.tuning.low_light.apply(LowLightOptions::new())?)
            .haze(self.tuning.fog.apply(HazeOptions::new()))
            .smoke(self.tuning.smoke.apply(SmokeOptions::new()));
        options.validate()?;
        Ok(options)
    }
}

impl LowLightTuning {
    fn apply(&self, mut options: LowLightOptions) -> Result<LowLightOptions, RestoreError> {
        if let Some(v) = self.max_dimension {
            options.max_dimension = v;
        }
        if let Some(v) = self.clahe_clip_limit {
            options.clahe_clip_limit = v;
        }
        if let Some(v) = self.clahe_tiles {
            options.clahe_tiles = v;
        }
        if self.gamma_steps.is_some() || self.gamma_fallback.is_some() {
            let steps = match &self.gamma_steps {
                Some(steps) => steps.iter().map(|s| (s.below, s.gamma)).collect(),
                None => options.gamma_policy.steps().to_vec(),
            };
            let fallback = self
                .gamma_fallback
                .unwrap_or(options.gamma_policy.fallback());
            options.gamma_policy = StepPolicy::new(steps, fallback)?;
        }
        if let Some(v) = self.sharpen_strength {
            options.sharpen_strength = v;
        }
        Ok(options)
    }
}

impl FogTuning {
    fn apply(&self, mut options: HazeOptions) -> HazeOptions {
        if let Some(v) = self.patch_size {
            options.patch_size = v;
        }
        if let Some(v) = self.atmosphere_fraction {
            options.atmosphere_fraction = v;
        }
        if let Some(v) = self.omega {
            options.omega = v;
        }
        if let Some(v) = self.transmission_epsilon {
            options.epsilon = v;
        }
        if let Some(v) = self.guided_radius {
            options.guided_radius = v;
        }
        if let Some(v) = self.guided_eps {
            options.guided_eps = v;
        }
        if let Some(v) = self.min_transmission {
            options.min_transmission = v;
        }
        if let Some(v) = self.sharpen_strength {
            options.sharpen_strength = v;
        }
        options
    }
}

impl SmokeTuning {
    fn apply(&self, mut options: SmokeOptions) -> SmokeOptions {
        if let Some(v) = self.bilateral_diameter {
            options.bilateral_diameter = v;
        }
        if let Some(v) = self.bilateral_sigma_color {
            options.bilateral_sigma_color = v;
        }
        if let Some(v) = self.bilateral_sigma_space {
            options.bilateral_sigma_space = v;
        }
        let nlm = NlmParams {
            h_luma: self.nlm_h_luma.unwrap_or(options.nlm.h_luma),
            h_chroma: self.nlm_h_chroma.unwrap_or(options.nlm.h_chroma),
            template_size: self.nlm_template_size.unwrap_or(options.nlm.template_size),
            search_size: self.nlm_search_size.unwrap_or(options.nlm.search_size),
        };
        options.nlm = nlm;
        if let Some(v) = self.sharpen_strength {
            options.sharpen_strength = v;
        }
        options
    }
}
