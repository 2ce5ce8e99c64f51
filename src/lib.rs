//! # Frecency Optim
//!
//! First-order optimizers for fitting a frecency regression model.
//!
//! Frecency blends how often and how recently a URL was visited into a single
//! ranking score. This crate generates synthetic (visit type x recency) samples
//! labeled with their frecency, provides a family of stateful update rules
//! that turn gradients into parameter steps, and a checkpoint helper that
//! keeps the best model seen during training.
//!
//! ```
//! use frecency_optim::optimizer::{Optimizer, SignAgreement};
//!
//! let mut rprop = SignAgreement::rprop(1.0, 2).unwrap();
//! assert_eq!(rprop.update(&[1.0, -1.0]).unwrap(), vec![1.0, -1.0]);
//! ```

pub mod checkpoint;
pub mod config;
pub mod data;
mod error;
pub mod loss;
pub mod model;
pub mod optimizer;

// Re-export main types
pub use checkpoint::{CheckpointOutcome, ModelCheckpoint};
pub use config::{OptimizerConfig, RunConfig};
pub use data::{Batch, DataGenerator, FrecencyGenerator};
pub use error::{Error, Result};
pub use model::{LinearModel, Model};
pub use optimizer::Optimizer;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FrecencyConfig;
    use crate::optimizer::SignAgreement;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rprop_fits_frecency_points() {
        let generator = FrecencyGenerator::new(&FrecencyConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut model = LinearModel::new(generator.num_categories());
        let mut optimizer = SignAgreement::rprop(1.0, generator.num_categories()).unwrap();

        for _ in 0..300 {
            let batch = generator.sample_with(&mut rng, 512);
            let grad = model.gradient(&batch.features, &batch.labels).unwrap();
            optimizer.step(&mut model.weights, &grad).unwrap();
        }

        let validation = generator.sample_with(&mut rng, 2000);
        let score = loss::r2_score(&validation.labels, &model.predict(&validation.features));
        assert!(score > 0.99, "r2 was {score}");
    }
}
