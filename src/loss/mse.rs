use super::Loss;

/// Mean Squared Error loss
pub struct MSELoss;

impl Loss for MSELoss {
    fn forward(predictions: &[f64], targets: &[f64]) -> f64 {
        let n = predictions.len();
        assert_eq!(n, targets.len(), "Predictions and targets must have same length");
        if n == 0 {
            return 0.0;
        }

        let sum_squared_error: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| (p - t) * (p - t))
            .sum();

        sum_squared_error / n as f64
    }

    fn backward(predictions: &[f64], targets: &[f64]) -> Vec<f64> {
        let n = predictions.len();
        assert_eq!(n, targets.len(), "Predictions and targets must have same length");

        predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| 2.0 * (p - t) / n as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mse_loss() {
        let predictions = vec![0.5, 0.8];
        let targets = vec![0.4, 0.9];

        let loss = MSELoss::forward(&predictions, &targets);
        let gradients = MSELoss::backward(&predictions, &targets);

        // ((0.5-0.4)^2 + (0.8-0.9)^2) / 2 = 0.01
        assert_relative_eq!(loss, 0.01, epsilon = 1e-12);

        // [2*(0.5-0.4)/2, 2*(0.8-0.9)/2] = [0.1, -0.1]
        assert_relative_eq!(gradients[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(gradients[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_mse_empty() {
        assert_eq!(MSELoss::forward(&[], &[]), 0.0);
        assert!(MSELoss::backward(&[], &[]).is_empty());
    }
}
