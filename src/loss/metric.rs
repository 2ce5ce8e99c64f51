//! Validation metrics, higher is better

use super::{Loss, MSELoss};

/// Coefficient of determination
///
/// 1.0 for a perfect fit, 0.0 for always predicting the mean, negative for
/// anything worse. Constant targets score 1.0 when matched exactly and 0.0
/// otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Targets and predictions must have same length");
    if y_true.is_empty() {
        return 0.0;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p) * (t - p)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Mean squared error, negated so that larger is better
pub fn neg_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    -MSELoss::forward(y_pred, y_true)
}
