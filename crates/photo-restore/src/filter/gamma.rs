//! Power-law intensity remapping through a 256-entry table.

use crate::buffer::PixelBuffer;
use crate::error::{ensure_positive, RestoreError};

/// Gamma lookup table.
///
/// `table[i] = round(255 * (i / 255) ^ (1 / gamma))`. Gamma above 1 lifts
/// mid-tones, below 1 darkens them. The same table is applied to all three
/// channels. Tables are cheap to build, so callers construct one per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    /// Build the table for `gamma`.
    ///
    /// # Errors
    /// [`RestoreError::InvalidParameter`] when `gamma` is not finite and > 0.
    pub fn new(gamma: f32) -> Result<Self, RestoreError> {
        ensure_positive("gamma", gamma)?;
        let inv_gamma = 1.0 / gamma as f64;

        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let v = (i as f64 / 255.0).powf(inv_gamma) * 255.0;
            *entry = v.round().clamp(0.0, 255.0) as u8;
        }
        Ok(Self { table })
    }

    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    pub fn as_slice(&self) -> &[u8; 256] {
        &self.table
    }

    /// Remap every sample of `buffer`.
    pub fn apply(&self, buffer: &PixelBuffer) -> PixelBuffer {
        buffer.map_samples(|v| self.map(v))
    }
}

/// Apply gamma correction to every channel of every pixel.
///
/// # Example
/// ```
/// use photo_restore::{filter::apply_gamma, PixelBuffer};
///
/// let dark = PixelBuffer::filled(2, 2, [64, 64, 64]).unwrap();
/// let lifted = apply_gamma(&dark, 1.8).unwrap();
/// assert!(lifted.pixel(0, 0)[0] > 64);
/// ```
pub fn apply_gamma(buffer: &PixelBuffer, gamma: f32) -> Result<PixelBuffer, RestoreError> {
    Ok(GammaTable::new(gamma)?.apply(buffer))
}
