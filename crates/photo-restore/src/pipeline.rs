//! Mode dispatch.

use std::fmt;

use crate::buffer::PixelBuffer;
use crate::enhance::{enhance_low_light, reduce_smoke, remove_haze};
use crate::error::RestoreError;
use crate::options::RestoreOptions;

/// A restoration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Underexposed or night scenes (`"low_light"`)
    LowLight,
    /// Fog and haze (`"fog"`)
    Fog,
    /// Smoke and sensor noise (`"smoke"`)
    Smoke,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::LowLight, Mode::Fog, Mode::Smoke];

    /// The mode tag as accepted by [`Mode::from_tag`].
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::LowLight => "low_light",
            Mode::Fog => "fog",
            Mode::Smoke => "smoke",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::LowLight => "Low light / night",
            Mode::Fog => "Fog / haze",
            Mode::Smoke => "Smoke / noise",
        }
    }

    /// Exact, case-sensitive tag lookup.
    pub fn from_tag(tag: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.as_str() == tag)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs a buffer through one of the three enhancers.
///
/// Holds only validated options; every call builds its own intermediate
/// buffers, so one `Restorer` can serve concurrent callers.
///
/// # Example
///
/// ```
/// use photo_restore::{PixelBuffer, Restorer};
///
/// let restorer = Restorer::new();
/// let input = PixelBuffer::filled(8, 8, [40, 40, 40]).unwrap();
///
/// // Unknown tags pass the image through untouched.
/// let same = restorer.process(&input, "sepia").unwrap();
/// assert_eq!(same, input);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Restorer {
    options: RestoreOptions,
}

impl Restorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// [`RestoreError::InvalidParameter`] naming the first invalid setting.
    pub fn with_options(options: RestoreOptions) -> Result<Self, RestoreError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RestoreOptions {
        &self.options
    }

    /// Dispatch on a mode tag. Tags other than `"low_light"`, `"fog"` and
    /// `"smoke"` return a copy of the input.
    pub fn process(&self, buffer: &PixelBuffer, mode: &str) -> Result<PixelBuffer, RestoreError> {
        match Mode::from_tag(mode) {
            Some(mode) => self.run(buffer, mode),
            None => {
                tracing::debug!(mode, "Unknown mode, passing image through");
                Ok(buffer.clone())
            }
        }
    }

    pub fn run(&self, buffer: &PixelBuffer, mode: Mode) -> Result<PixelBuffer, RestoreError> {
        let (width, height) = buffer.dimensions();
        tracing::debug!(%mode, width, height, "Restoring image");
        match mode {
            Mode::LowLight => enhance_low_light(buffer, &self.options.low_light),
            Mode::Fog => remove_haze(buffer, &self.options.haze),
            Mode::Smoke => reduce_smoke(buffer, &self.options.smoke),
        }
    }
}

/// [`Restorer::process`] with default options.
pub fn process(buffer: &PixelBuffer, mode: &str) -> Result<PixelBuffer, RestoreError> {
    Restorer::new().process(buffer, mode)
}
