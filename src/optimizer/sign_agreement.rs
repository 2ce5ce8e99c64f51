//! Per-feature adaptive step sizes driven by gradient sign agreement
//!
//! Every feature keeps its own rate. When a gradient component has the same
//! sign as on the previous call the rate grows by `growth`, when the sign
//! flips it shrinks by `shrink`, and when either component is zero it stays
//! put. Rates never leave `[min, max]`.
//!
//! The [`StepRule`] decides how rates and gradient are combined into a step:
//!
//! * [`StepRule::Scaled`]: `rate * gradient` (adaptive gradient descent)
//! * [`StepRule::Resilient`]: `rate * sign(gradient)` (RProp)
//! * [`StepRule::ResilientQuantized`]: like `Resilient`, but rates are rounded
//!   to integers before use

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{FeatureShape, Optimizer, check_learning_rate, numeric};
use crate::error::{Error, Result};

pub const DEFAULT_MIN_RATE: f64 = 1e-7;
pub const DEFAULT_MAX_RATE: f64 = 50.0;
pub const DEFAULT_GROWTH: f64 = 1.2;
pub const DEFAULT_SHRINK: f64 = 0.5;

/// How the per-feature rates turn into a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepRule {
    Scaled,
    #[default]
    Resilient,
    ResilientQuantized,
}

/// Inclusive range every per-feature rate is kept in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            min: DEFAULT_MIN_RATE,
            max: DEFAULT_MAX_RATE,
        }
    }
}

impl Bounds {
    fn contains(&self, rate: f64) -> bool {
        self.min <= rate && rate <= self.max
    }

    /// Integer range inside the bounds, if there is one
    fn integer_range(&self) -> Option<(f64, f64)> {
        let lo = self.min.ceil();
        let hi = self.max.floor();
        (lo <= hi).then_some((lo, hi))
    }
}

fn default_min() -> f64 {
    DEFAULT_MIN_RATE
}

fn default_max() -> f64 {
    DEFAULT_MAX_RATE
}

fn default_growth() -> f64 {
    DEFAULT_GROWTH
}

fn default_shrink() -> f64 {
    DEFAULT_SHRINK
}

/// Hyperparameters of a [`SignAgreement`] optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignAgreementConfig {
    pub learning_rate: f64,
    pub num_features: usize,
    #[serde(default = "default_min")]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default = "default_growth")]
    pub growth: f64,
    #[serde(default = "default_shrink")]
    pub shrink: f64,
    #[serde(default)]
    pub rule: StepRule,
}

impl SignAgreementConfig {
    /// Config with the default bounds and growth/shrink factors
    pub fn new(learning_rate: f64, num_features: usize, rule: StepRule) -> Self {
        SignAgreementConfig {
            learning_rate,
            num_features,
            min: DEFAULT_MIN_RATE,
            max: DEFAULT_MAX_RATE,
            growth: DEFAULT_GROWTH,
            shrink: DEFAULT_SHRINK,
            rule,
        }
    }

    fn validate(&self) -> Result<()> {
        check_learning_rate(self.learning_rate)?;
        if self.num_features == 0 {
            return Err(Error::invalid_config("num_features must be positive"));
        }
        if !(self.min > 0.0 && self.min <= self.max && self.max.is_finite()) {
            return Err(Error::invalid_config(format!(
                "rate bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        if !(self.min <= self.learning_rate && self.learning_rate <= self.max) {
            return Err(Error::invalid_config(format!(
                "learning rate {} is outside [{}, {}]",
                self.learning_rate, self.min, self.max
            )));
        }
        if !(self.growth >= 1.0 && self.growth.is_finite()) {
            return Err(Error::invalid_config(format!(
                "growth factor must be >= 1, got {}",
                self.growth
            )));
        }
        if !(self.shrink > 0.0 && self.shrink <= 1.0) {
            return Err(Error::invalid_config(format!(
                "shrink factor must be in (0, 1], got {}",
                self.shrink
            )));
        }
        Ok(())
    }
}

/// Sign-agreement optimizer family (adaptive gradient descent, RProp)
#[derive(Debug, Clone)]
pub struct SignAgreement {
    rates: Vec<f64>,
    last_gradient: Option<Vec<f64>>,
    bounds: Bounds,
    growth: f64,
    shrink: f64,
    rule: StepRule,
    shape: FeatureShape,
    t: usize,
}

impl SignAgreement {
    pub fn new(config: SignAgreementConfig) -> Result<Self> {
        config.validate()?;

        let bounds = Bounds {
            min: config.min,
            max: config.max,
        };
        if config.rule == StepRule::ResilientQuantized && bounds.integer_range().is_none() {
            return Err(Error::invalid_config(format!(
                "no integer rate fits in [{}, {}]",
                bounds.min, bounds.max
            )));
        }

        Ok(SignAgreement {
            rates: vec![config.learning_rate; config.num_features],
            last_gradient: None,
            bounds,
            growth: config.growth,
            shrink: config.shrink,
            rule: config.rule,
            shape: FeatureShape::Fixed(config.num_features),
            t: 0,
        })
    }

    /// Magnitude-scaled variant: `step = rate * gradient`
    pub fn adaptive_gradient_descent(learning_rate: f64, num_features: usize) -> Result<Self> {
        Self::new(SignAgreementConfig::new(learning_rate, num_features, StepRule::Scaled))
    }

    /// Resilient variant: `step = rate * sign(gradient)`
    pub fn rprop(learning_rate: f64, num_features: usize) -> Result<Self> {
        Self::new(SignAgreementConfig::new(learning_rate, num_features, StepRule::Resilient))
    }

    /// Resilient variant with integer rates
    pub fn quantized_rprop(learning_rate: f64, num_features: usize) -> Result<Self> {
        Self::new(SignAgreementConfig::new(
            learning_rate,
            num_features,
            StepRule::ResilientQuantized,
        ))
    }

    /// Current per-feature rates
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn rule(&self) -> StepRule {
        self.rule
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Grow or shrink each rate according to sign agreement with the last gradient
    fn adapt_rates(&mut self, gradient: &[f64]) {
        let Some(last) = &self.last_gradient else {
            debug!("sign agreement: first gradient, {} rates unchanged", self.rates.len());
            return;
        };

        let Bounds { min, max } = self.bounds;
        let (mut grown, mut shrunk) = (0usize, 0usize);

        for ((rate, &g), &prev) in self.rates.iter_mut().zip(gradient).zip(last) {
            let agreement = g * prev;
            if agreement > 0.0 {
                *rate = (*rate * self.growth).min(max);
                grown += 1;
            } else if agreement < 0.0 {
                *rate = (*rate * self.shrink).max(min);
                shrunk += 1;
            }
        }

        trace!("sign agreement: t={} grown={grown} shrunk={shrunk}", self.t);
    }

    fn quantize_rates(&mut self) {
        if let Some((lo, hi)) = self.bounds.integer_range() {
            for rate in self.rates.iter_mut() {
                *rate = numeric::clamp_rate(numeric::quantize(*rate), lo, hi);
            }
        }
    }

    fn compose_step(&self, gradient: &[f64]) -> Vec<f64> {
        self.rates
            .iter()
            .zip(gradient)
            .map(|(&rate, &g)| match self.rule {
                StepRule::Scaled => rate * g,
                StepRule::Resilient | StepRule::ResilientQuantized => rate * numeric::sign(g),
            })
            .collect()
    }
}

impl Optimizer for SignAgreement {
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>> {
        self.shape.check(gradient.len())?;

        self.adapt_rates(gradient);
        if self.rule == StepRule::ResilientQuantized {
            self.quantize_rates();
        }
        debug_assert!(
            self.rates.iter().all(|&r| self.bounds.contains(r)),
            "rate left [{}, {}]",
            self.bounds.min,
            self.bounds.max
        );

        let step = self.compose_step(gradient);

        match &mut self.last_gradient {
            Some(last) => last.copy_from_slice(gradient),
            None => self.last_gradient = Some(gradient.to_vec()),
        }
        self.t += 1;

        Ok(step)
    }

    fn time_step(&self) -> usize {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rprop_scenario() {
        let mut optimizer = SignAgreement::rprop(1.0, 2).unwrap();

        let step = optimizer.update(&[1.0, -1.0]).unwrap();
        assert_eq!(step, vec![1.0, -1.0]);
        assert_eq!(optimizer.rates(), &[1.0, 1.0]);

        let step = optimizer.update(&[2.0, 1.0]).unwrap();
        assert_relative_eq!(step[0], 1.2);
        assert_relative_eq!(step[1], 0.5);
        assert_relative_eq!(optimizer.rates()[0], 1.2);
        assert_relative_eq!(optimizer.rates()[1], 0.5);
    }

    #[test]
    fn test_scaled_variant_uses_gradient_magnitude() {
        let mut optimizer = SignAgreement::adaptive_gradient_descent(0.5, 2).unwrap();
        assert_eq!(optimizer.update(&[2.0, -4.0]).unwrap(), vec![1.0, -2.0]);

        let step = optimizer.update(&[3.0, 4.0]).unwrap();
        assert_relative_eq!(step[0], 0.6 * 3.0);
        assert_relative_eq!(step[1], 0.25 * 4.0);
    }

    #[test]
    fn test_zero_product_leaves_rate_unchanged() {
        let mut optimizer = SignAgreement::rprop(2.0, 3).unwrap();
        optimizer.update(&[0.0, 1.0, -1.0]).unwrap();
        let step = optimizer.update(&[5.0, 0.0, -1.0]).unwrap();

        assert_relative_eq!(optimizer.rates()[0], 2.0);
        assert_relative_eq!(optimizer.rates()[1], 2.0);
        assert_relative_eq!(optimizer.rates()[2], 2.4);
        // sign(0) = 0
        assert_eq!(step[1], 0.0);
    }

    #[test]
    fn test_rates_saturate_at_bounds() {
        let mut optimizer = SignAgreement::rprop(40.0, 2).unwrap();
        let mut sign = 1.0;
        for _ in 0..200 {
            optimizer.update(&[1.0, sign]).unwrap();
            sign = -sign;
            for &rate in optimizer.rates() {
                assert!((DEFAULT_MIN_RATE..=DEFAULT_MAX_RATE).contains(&rate));
            }
        }
        assert_eq!(optimizer.rates()[0], DEFAULT_MAX_RATE);
        assert_eq!(optimizer.rates()[1], DEFAULT_MIN_RATE);
    }

    #[test]
    fn test_quantized_steps_are_integers() {
        let mut optimizer = SignAgreement::quantized_rprop(5.0, 3).unwrap();
        let gradients = [
            [0.3, -0.2, 1.0],
            [0.1, 0.4, -2.0],
            [0.7, -0.9, 3.0],
            [0.2, 0.8, -0.1],
            [0.0, -0.3, 0.5],
        ];

        for g in &gradients {
            let step = optimizer.update(g).unwrap();
            for s in step {
                assert_eq!(s.abs().fract(), 0.0);
            }
            for &rate in optimizer.rates() {
                assert_eq!(rate.fract(), 0.0);
                assert!(rate >= 1.0 && rate <= DEFAULT_MAX_RATE);
            }
        }
    }

    #[test]
    fn test_quantized_growth_trace() {
        let mut optimizer = SignAgreement::quantized_rprop(5.0, 1).unwrap();
        // 5 -> 6 -> 7.2 rounds to 7 -> 8.4 rounds to 8
        let steps: Vec<f64> = (0..4).map(|_| optimizer.update(&[1.0]).unwrap()[0]).collect();
        assert_eq!(steps, vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_quantized_rates_never_round_to_zero() {
        let mut optimizer = SignAgreement::quantized_rprop(1.0, 1).unwrap();
        optimizer.update(&[1.0]).unwrap();
        // 1 * 0.5 = 0.5 rounds to 0, held at the lowest integer rate
        let step = optimizer.update(&[-1.0]).unwrap();
        assert_eq!(step, vec![-1.0]);
        assert_eq!(optimizer.rates(), &[1.0]);
    }

    #[test]
    fn test_quantized_requires_integer_in_bounds() {
        let mut config = SignAgreementConfig::new(0.3, 2, StepRule::ResilientQuantized);
        config.min = 0.2;
        config.max = 0.5;
        assert!(SignAgreement::new(config.clone()).is_err());

        config.rule = StepRule::Resilient;
        assert!(SignAgreement::new(config).is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(SignAgreement::rprop(1.0, 0).is_err());
        assert!(SignAgreement::rprop(60.0, 2).is_err());

        let mut config = SignAgreementConfig::new(1.0, 2, StepRule::Scaled);
        config.growth = 0.9;
        assert!(SignAgreement::new(config.clone()).is_err());

        config.growth = DEFAULT_GROWTH;
        config.shrink = 0.0;
        assert!(SignAgreement::new(config).is_err());
    }

    #[test]
    fn test_dimension_mismatch_keeps_state() {
        let mut optimizer = SignAgreement::rprop(1.0, 3).unwrap();
        assert!(optimizer.update(&[1.0, 1.0]).is_err());
        assert_eq!(optimizer.time_step(), 0);

        optimizer.update(&[1.0, 1.0, 1.0]).unwrap();
        let err = optimizer.update(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 3, got: 2 }));
        assert_eq!(optimizer.time_step(), 1);
        assert_eq!(optimizer.rates(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SignAgreementConfig =
            serde_json::from_str(r#"{"learning_rate": 0.1, "num_features": 15}"#).unwrap();
        assert_eq!(config, SignAgreementConfig::new(0.1, 15, StepRule::Resilient));

        let config: SignAgreementConfig = serde_json::from_str(
            r#"{"learning_rate": 2, "num_features": 4, "rule": "resilient_quantized", "max": 10}"#,
        )
        .unwrap();
        assert_eq!(config.rule, StepRule::ResilientQuantized);
        assert_eq!(config.max, 10.0);
    }
}
