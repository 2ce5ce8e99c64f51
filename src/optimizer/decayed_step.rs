use log::trace;

use super::{FeatureShape, Optimizer, check_learning_rate, numeric};
use crate::error::{Error, Result};

/// Gradient descent whose learning rate shrinks on every call
///
/// Call `e` (starting at 0) steps with the current rate and then divides it by
/// `1 + decay * e`, so the first two calls share the initial rate.
#[derive(Debug, Clone)]
pub struct DecayedStep {
    rate: f64,
    decay: f64,
    epoch: usize,
    shape: FeatureShape,
}

impl DecayedStep {
    pub fn new(learning_rate: f64, decay: f64) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        if !(decay >= 0.0 && decay.is_finite()) {
            return Err(Error::invalid_config(format!(
                "decay must be a non-negative number, got {decay}"
            )));
        }

        Ok(DecayedStep {
            rate: learning_rate,
            decay,
            epoch: 0,
            shape: FeatureShape::Unfixed,
        })
    }

    /// Rate that the next call will use
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }
}

impl Optimizer for DecayedStep {
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>> {
        self.shape.fix(gradient.len())?;

        let step = numeric::scale(gradient, self.rate);

        self.rate /= 1.0 + self.decay * self.epoch as f64;
        self.epoch += 1;
        trace!("decayed step: epoch={} next_rate={}", self.epoch, self.rate);

        Ok(step)
    }

    fn time_step(&self) -> usize {
        self.epoch
    }
}
