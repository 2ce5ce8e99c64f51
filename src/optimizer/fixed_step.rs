use super::{FeatureShape, Optimizer, check_learning_rate, numeric};
use crate::error::Result;

/// Plain gradient descent with a constant learning rate
#[derive(Debug, Clone)]
pub struct FixedStep {
    learning_rate: f64,
    shape: FeatureShape,
    t: usize,
}

impl FixedStep {
    /// Create a new FixedStep optimizer with the specified learning rate
    pub fn new(learning_rate: f64) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        Ok(FixedStep {
            learning_rate,
            shape: FeatureShape::Unfixed,
            t: 0,
        })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Optimizer for FixedStep {
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>> {
        self.shape.fix(gradient.len())?;
        self.t += 1;
        Ok(numeric::scale(gradient, self.learning_rate))
    }

    fn time_step(&self) -> usize {
        self.t
    }
}
