use crate::error::{Error, Result};
use crate::loss::{Loss, MSELoss};

/// Anything that maps feature rows to predicted scores
pub trait Model {
    fn predict(&self, features: &[Vec<f64>]) -> Vec<f64>;
}

/// Linear frecency model: one weight per feature, no bias
///
/// With one-hot inputs each weight is simply the predicted score of its
/// category.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub weights: Vec<f64>,
}

impl LinearModel {
    /// Create a zero-initialised model
    pub fn new(num_features: usize) -> Self {
        LinearModel {
            weights: vec![0.0; num_features],
        }
    }

    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    /// Score a single row
    pub fn forward(&self, row: &[f64]) -> f64 {
        row.iter().zip(&self.weights).map(|(x, w)| x * w).sum()
    }

    /// Gradient of the mean squared error over a batch with respect to the weights
    pub fn gradient(&self, features: &[Vec<f64>], labels: &[f64]) -> Result<Vec<f64>> {
        if features.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: features.len(),
                got: labels.len(),
            });
        }
        if let Some(row) = features.iter().find(|row| row.len() != self.weights.len()) {
            return Err(Error::DimensionMismatch {
                expected: self.weights.len(),
                got: row.len(),
            });
        }

        let predictions = self.predict(features);
        let output_grad = MSELoss::backward(&predictions, labels);

        let mut grad = vec![0.0; self.weights.len()];
        for (row, &dy) in features.iter().zip(&output_grad) {
            for (g, &x) in grad.iter_mut().zip(row) {
                *g += dy * x;
            }
        }

        Ok(grad)
    }

    /// Subtract an optimizer step from the weights
    pub fn apply(&mut self, step: &[f64]) -> Result<()> {
        if step.len() != self.weights.len() {
            return Err(Error::DimensionMismatch {
                expected: self.weights.len(),
                got: step.len(),
            });
        }

        for (w, s) in self.weights.iter_mut().zip(step) {
            *w -= s;
        }

        Ok(())
    }
}

impl Model for LinearModel {
    fn predict(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features.iter().map(|row| self.forward(row)).collect()
    }
}
