//! JSON configuration for optimizers and experiment runs
//!
//! # Example
//!
//! ```json
//! {
//!   "optimizer": { "kind": "sign_agreement", "learning_rate": 1.0, "num_features": 15 },
//!   "epochs": 40,
//!   "batch_size": 64
//! }
//! ```
//!
//! Every field of a run config is optional; missing fields take the values of
//! [`RunConfig::default`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::checkpoint::DEFAULT_NUM_SAMPLED;
use crate::data::FrecencyConfig;
use crate::error::{Error, Result};
use crate::optimizer::{
    Adam, DecayedStep, FixedStep, Optimizer, SignAgreement, SignAgreementConfig,
};

/// Which optimizer to build, with its hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    FixedStep { learning_rate: f64 },
    DecayedStep { learning_rate: f64, decay: f64 },
    SignAgreement(SignAgreementConfig),
    Adam { learning_rate: f64 },
}

impl OptimizerConfig {
    pub fn build(&self) -> Result<Box<dyn Optimizer>> {
        Ok(match self {
            OptimizerConfig::FixedStep { learning_rate } => {
                Box::new(FixedStep::new(*learning_rate)?)
            }
            OptimizerConfig::DecayedStep { learning_rate, decay } => {
                Box::new(DecayedStep::new(*learning_rate, *decay)?)
            }
            OptimizerConfig::SignAgreement(config) => {
                Box::new(SignAgreement::new(config.clone())?)
            }
            OptimizerConfig::Adam { learning_rate } => Box::new(Adam::new(*learning_rate)?),
        })
    }

    /// Short human-readable label
    pub fn label(&self) -> String {
        match self {
            OptimizerConfig::FixedStep { learning_rate } => {
                format!("fixed_step(lr={learning_rate})")
            }
            OptimizerConfig::DecayedStep { learning_rate, decay } => {
                format!("decayed_step(lr={learning_rate}, decay={decay})")
            }
            OptimizerConfig::SignAgreement(config) => {
                format!("sign_agreement/{:?}(lr={})", config.rule, config.learning_rate)
            }
            OptimizerConfig::Adam { learning_rate } => format!("adam(lr={learning_rate})"),
        }
    }
}

/// Settings for one training run of the demo binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Optimizer to train with; `None` compares every built-in variant
    pub optimizer: Option<OptimizerConfig>,
    pub generator: FrecencyConfig,
    pub epochs: usize,
    pub batch_size: usize,
    pub samples_per_epoch: usize,
    /// Validation rows drawn per checkpoint evaluation
    pub num_sampled: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            optimizer: None,
            generator: FrecencyConfig::default(),
            epochs: 30,
            batch_size: 64,
            samples_per_epoch: 2048,
            num_sampled: DEFAULT_NUM_SAMPLED,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a run config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
            ("samples_per_epoch", self.samples_per_epoch),
            ("num_sampled", self.num_sampled),
        ] {
            if value == 0 {
                return Err(Error::invalid_config(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}
