pub mod config;

pub use config::{AppConfig, FogTuning, GammaStep, LowLightTuning, SmokeTuning, TuningConfig};
