#![allow(clippy::excessive_precision, clippy::needless_range_loop)]

//! photo-restore: deterministic restoration of degraded photographs
//!
//! Three modes, each a fixed sequence of numeric image transforms:
//!
//! | Tag         | Enhancer                        | Steps |
//! |-------------|---------------------------------|-------|
//! | `low_light` | [`enhance::enhance_low_light`]  | downscale guard, white balance, CLAHE, adaptive gamma, sharpen |
//! | `fog`       | [`enhance::remove_haze`]        | dark channel, atmospheric light, transmission, guided refinement, radiance recovery, white balance, sharpen |
//! | `smoke`     | [`enhance::reduce_smoke`]       | white balance, bilateral filter, non-local means, sharpen |
//!
//! Any other tag passes the image through unchanged.
//!
//! # Quick Start
//!
//! ```
//! use photo_restore::{PixelBuffer, Restorer};
//!
//! let dark = PixelBuffer::from_fn(32, 24, |x, y| {
//!     let v = ((x + y) / 2) as u8;
//!     [v, v, v]
//! })
//! .unwrap();
//!
//! let restorer = Restorer::new();
//! let brighter = restorer.process(&dark, "low_light").unwrap();
//! assert_eq!(brighter.dimensions(), (32, 24));
//! ```
//!
//! # Pixel Representations
//!
//! Enhancers take and return [`PixelBuffer`] (interleaved 8-bit RGB). The
//! dehazing stages work on [`FloatBuffer`] (0.0..=1.0) and single-channel
//! [`Plane`]s. Conversions round to nearest and clamp: `float = int / 255`,
//! `int = round(float * 255)`.
//!
//! Luminance-only stages (white balance, CLAHE) and the non-local means
//! denoiser share one RGB <-> L\*a\*b\* conversion in [`color::lab`], so all
//! modes drift identically through the round trip.
//!
//! # Tuning
//!
//! Every constant (CLAHE clip limit, transmission floor, bilateral sigmas,
//! NLM strengths, ...) is a named default in [`RestoreOptions`]. Options are
//! validated before any pixel work; invalid values yield
//! [`RestoreError::InvalidParameter`] naming the field.
//!
//! # Parallelism
//!
//! Filters write a fresh output buffer row by row (rayon above a size
//! threshold) while reading an immutable source. No state survives a call,
//! so independent calls may run concurrently.

pub mod buffer;
pub mod color;
pub mod enhance;
pub mod error;
pub mod filter;
pub mod options;
pub mod pipeline;
pub mod policy;

mod parallel;


pub use buffer::{u8_to_unit, unit_to_u8, FloatBuffer, PixelBuffer, Plane};
pub use enhance::HazeEstimate;
pub use error::RestoreError;
pub use options::{HazeOptions, LowLightOptions, RestoreOptions, SmokeOptions};
pub use pipeline::{process, Mode, Restorer};
pub use policy::StepPolicy;
