//! Optimizers turning gradients into parameter steps
//!
//! Every optimizer owns its state and advances it exactly once per
//! [`Optimizer::update`] call. Instances are not meant to be shared between
//! threads; wrap one in a mutex if several callers need it.

mod adam;
mod decayed_step;
mod fixed_step;
pub mod numeric;
mod shape;
mod sign_agreement;

pub use adam::Adam;
pub use decayed_step::DecayedStep;
pub use fixed_step::FixedStep;
pub use shape::FeatureShape;
pub use sign_agreement::{Bounds, SignAgreement, SignAgreementConfig, StepRule};

use crate::error::{Error, Result};

/// Common trait for optimizers
pub trait Optimizer {
    /// Compute the step for `gradient` and advance the internal state
    ///
    /// The first call fixes the number of features. A later gradient of a
    /// different length fails with [`Error::DimensionMismatch`] and leaves the
    /// state as it was. Do not retry a failed call with the same input.
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>>;

    /// Number of successful `update` calls so far
    fn time_step(&self) -> usize;

    /// Apply one descent step to `params` in place
    fn step(&mut self, params: &mut [f64], gradient: &[f64]) -> Result<()> {
        if params.len() != gradient.len() {
            return Err(Error::DimensionMismatch {
                expected: params.len(),
                got: gradient.len(),
            });
        }

        let step = self.update(gradient)?;
        for (p, s) in params.iter_mut().zip(step) {
            *p -= s;
        }

        Ok(())
    }
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>> {
        (**self).update(gradient)
    }

    fn time_step(&self) -> usize {
        (**self).time_step()
    }
}

pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if !learning_rate.is_finite() {
        return Err(Error::invalid_config(format!(
            "learning rate must be finite, got {learning_rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_applies_descent() {
        let mut optimizer = FixedStep::new(0.5).unwrap();
        let mut params = vec![1.0, 1.0];
        optimizer.step(&mut params, &[2.0, -2.0]).unwrap();
        assert_eq!(params, vec![0.0, 2.0]);
        assert_eq!(optimizer.time_step(), 1);
    }

    #[test]
    fn test_step_rejects_mismatched_params() {
        let mut optimizer = Adam::new(1.0).unwrap();
        let mut params = vec![0.0; 3];
        let err = optimizer.step(&mut params, &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 3, got: 2 }));
        // Nothing was consumed
        assert_eq!(optimizer.time_step(), 0);
    }

    #[test]
    fn test_boxed_optimizers() {
        let mut optimizers: Vec<Box<dyn Optimizer>> = vec![
            Box::new(FixedStep::new(0.1).unwrap()),
            Box::new(DecayedStep::new(0.1, 0.01).unwrap()),
            Box::new(SignAgreement::rprop(0.1, 2).unwrap()),
            Box::new(SignAgreement::adaptive_gradient_descent(0.1, 2).unwrap()),
            Box::new(SignAgreement::quantized_rprop(1.0, 2).unwrap()),
            Box::new(Adam::new(0.1).unwrap()),
        ];

        for optimizer in optimizers.iter_mut() {
            for _ in 0..3 {
                let step = optimizer.update(&[0.3, -0.7]).unwrap();
                assert_eq!(step.len(), 2);
            }
            assert_eq!(optimizer.time_step(), 3);
            assert!(optimizer.update(&[1.0, 2.0, 3.0]).is_err());
            assert_eq!(optimizer.time_step(), 3);
        }
    }

    #[test]
    fn test_non_finite_learning_rate_rejected() {
        assert!(FixedStep::new(f64::NAN).is_err());
        assert!(Adam::new(f64::INFINITY).is_err());
    }
}
