//! Error type for the restoration pipeline.
//!
//! Only caller contract violations are errors. Flat histograms, near-zero
//! transmission and unknown mode tags all have defined, finite outputs and
//! never surface here.

use thiserror::Error;

/// Errors returned by buffer construction and filter entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestoreError {
    /// A tuning parameter is outside its valid domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the options structs
        name: &'static str,
        /// The rejected value
        value: f64,
        /// What the parameter must satisfy
        reason: &'static str,
    },

    /// Width or height is zero.
    #[error("image has no pixels")]
    EmptyImage,

    /// Raw sample count does not match `width * height * 3`.
    #[error("pixel data length mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Samples implied by the dimensions
        expected: usize,
        /// Samples actually supplied
        actual: usize,
    },
}

impl RestoreError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        RestoreError::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }
}

/// Reject values that are not finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), RestoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RestoreError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Reject values that are not finite and non-negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), RestoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RestoreError::invalid(name, value, "must be finite and >= 0"))
    }
}

/// Reject window sizes that are zero or even.
pub(crate) fn ensure_odd_window(name: &'static str, size: usize) -> Result<(), RestoreError> {
    if size % 2 == 1 {
        Ok(())
    } else {
        Err(RestoreError::invalid(
            name,
            size as f64,
            "window size must be odd and >= 1",
        ))
    }
}
