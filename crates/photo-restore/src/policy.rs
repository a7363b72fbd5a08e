//! Piecewise-constant parameter selection.

use crate::error::RestoreError;

/// Ordered `(upper bound, value)` steps with a fallback.
///
/// [`value_for`](Self::value_for) returns the value of the first step whose
/// bound is strictly greater than the measurement, or the fallback when no
/// step matches. Bounds must be strictly increasing.
///
/// # Example
///
/// ```
/// use photo_restore::StepPolicy;
///
/// let gamma = StepPolicy::new(vec![(60.0, 1.8), (90.0, 1.5)], 1.2).unwrap();
/// assert_eq!(gamma.value_for(0.0), 1.8);
/// assert_eq!(gamma.value_for(60.0), 1.5);
/// assert_eq!(gamma.value_for(200.0), 1.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StepPolicy {
    steps: Vec<(f64, f32)>,
    fallback: f32,
}

impl StepPolicy {
    /// # Errors
    /// [`RestoreError::InvalidParameter`] when the bounds are not finite and
    /// strictly increasing.
    pub fn new(steps: Vec<(f64, f32)>, fallback: f32) -> Result<Self, RestoreError> {
        for (bound, _) in &steps {
            if !bound.is_finite() {
                return Err(RestoreError::invalid(
                    "policy_bound",
                    *bound,
                    "bounds must be finite",
                ));
            }
        }
        for pair in steps.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(RestoreError::invalid(
                    "policy_bound",
                    pair[1].0,
                    "bounds must be strictly increasing",
                ));
            }
        }
        Ok(Self { steps, fallback })
    }

    /// Gamma by mean brightness for low-light images: darker images are
    /// lifted harder (`< 60` → 1.8, `< 90` → 1.5, else 1.2).
    pub fn low_light_gamma() -> Self {
        Self {
            steps: vec![(60.0, 1.8), (90.0, 1.5)],
            fallback: 1.2,
        }
    }

    pub fn value_for(&self, measurement: f64) -> f32 {
        self.steps
            .iter()
            .find(|(bound, _)| measurement < *bound)
            .map(|&(_, value)| value)
            .unwrap_or(self.fallback)
    }

    pub fn steps(&self) -> &[(f64, f32)] {
        &self.steps
    }

    pub fn fallback(&self) -> f32 {
        self.fallback
    }

    /// Every value the policy can produce.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.steps
            .iter()
            .map(|&(_, v)| v)
            .chain(std::iter::once(self.fallback))
    }
}
