//! Loss functions and validation metrics

mod metric;
mod mse;

pub use metric::{neg_mean_squared_error, r2_score};
pub use mse::MSELoss;

/// Common trait for loss functions
pub trait Loss {
    /// Calculate the loss between predictions and targets
    fn forward(predictions: &[f64], targets: &[f64]) -> f64;

    /// Calculate the gradient of the loss with respect to each prediction
    fn backward(predictions: &[f64], targets: &[f64]) -> Vec<f64>;
}
