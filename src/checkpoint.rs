//! Keeps the best model seen while training

use log::info;

use crate::data::DataGenerator;
use crate::model::Model;

/// Number of validation rows drawn per evaluation unless overridden
pub const DEFAULT_NUM_SAMPLED: usize = 10_000;

/// Result of one [`ModelCheckpoint::evaluate`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckpointOutcome {
    pub metric: f64,
    /// Whether this evaluation replaced the best model
    pub improved: bool,
}

/// Evaluates models on freshly sampled validation data and keeps the best one
///
/// `metric_fn(y_true, y_pred)` must be "higher is better". A model only
/// replaces the current best when its metric is strictly greater, so a NaN
/// metric never wins.
pub struct ModelCheckpoint<G, M, F> {
    metric_fn: F,
    generator: G,
    num_sampled: usize,
    best_model: Option<M>,
    best_metric: f64,
}

impl<G, M, F> ModelCheckpoint<G, M, F>
where
    G: DataGenerator,
    M: Model + Clone,
    F: Fn(&[f64], &[f64]) -> f64,
{
    pub fn new(metric_fn: F, generator: G) -> Self {
        Self::with_num_sampled(metric_fn, generator, DEFAULT_NUM_SAMPLED)
    }

    pub fn with_num_sampled(metric_fn: F, generator: G, num_sampled: usize) -> Self {
        ModelCheckpoint {
            metric_fn,
            generator,
            num_sampled,
            best_model: None,
            best_metric: f64::NEG_INFINITY,
        }
    }

    /// Score `model` on new validation data and keep it if it is the best so far
    pub fn evaluate(&mut self, model: &M) -> CheckpointOutcome {
        let validation = self.generator.sample(self.num_sampled);
        let predictions = model.predict(&validation.features);
        let metric = (self.metric_fn)(&validation.labels, &predictions);

        let improved = metric > self.best_metric;
        if improved {
            self.best_metric = metric;
            self.best_model = Some(model.clone());
            info!("[ModelCheckpoint] New best model with {metric:.5} validation accuracy");
        } else {
            info!("validation: {metric:.3} accuracy");
        }

        CheckpointOutcome { metric, improved }
    }

    pub fn best_model(&self) -> Option<&M> {
        self.best_model.as_ref()
    }

    /// Best metric so far, `-inf` before the first evaluation
    pub fn best_metric(&self) -> f64 {
        self.best_metric
    }

    pub fn num_sampled(&self) -> usize {
        self.num_sampled
    }

    /// Give up the best model, if any
    pub fn into_best_model(self) -> Option<M> {
        self.best_model
    }
}
