use log::debug;

use super::{FeatureShape, Optimizer, check_learning_rate, numeric};
use crate::error::Result;

pub const BETA1: f64 = 0.9;
pub const BETA2: f64 = 0.999;
/// Scale of the inner update added to `theta` on every call
pub const ALPHA: f64 = 0.01;
pub const EPSILON: f64 = 1e-8;

/// Adam-style optimizer with an accumulated pseudo-parameter
///
/// Keeps bias-corrected moving averages of the gradient and its square and
/// adds `ALPHA * m_hat / (sqrt(v_hat) + EPSILON)` to `theta` on every call.
/// The returned step is `learning_rate * theta`, i.e. a scaled running sum of
/// Adam updates rather than the usual per-call Adam step. `theta` is never
/// reset.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    m: Vec<f64>,     // First moment estimate
    v: Vec<f64>,     // Second moment estimate
    theta: Vec<f64>, // Accumulated pseudo-parameter
    shape: FeatureShape,
    t: usize,
}

impl Adam {
    /// Create a new Adam optimizer with the specified learning rate
    pub fn new(learning_rate: f64) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        Ok(Adam {
            learning_rate,
            m: Vec::new(),
            v: Vec::new(),
            theta: Vec::new(),
            shape: FeatureShape::Unfixed,
            t: 0,
        })
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn first_moment(&self) -> &[f64] {
        &self.m
    }

    pub fn second_moment(&self) -> &[f64] {
        &self.v
    }

    /// Allocate the moment vectors for `len` features
    fn initialize(&mut self, len: usize) {
        self.m = vec![0.0; len];
        self.v = vec![0.0; len];
        self.theta = vec![0.0; len];
        debug!("adam: allocated state for {len} features");
    }
}

impl Optimizer for Adam {
    fn update(&mut self, gradient: &[f64]) -> Result<Vec<f64>> {
        if self.shape.fix(gradient.len())? {
            self.initialize(gradient.len());
        }

        self.t += 1;

        let bias1 = 1.0 - BETA1.powi(self.t as i32);
        let bias2 = 1.0 - BETA2.powi(self.t as i32);

        for (((&g, m), v), theta) in gradient
            .iter()
            .zip(self.m.iter_mut())
            .zip(self.v.iter_mut())
            .zip(self.theta.iter_mut())
        {
            *m = BETA1 * *m + (1.0 - BETA1) * g;
            *v = BETA2 * *v + (1.0 - BETA2) * g * g;

            let m_hat = *m / bias1;
            let v_hat = *v / bias2;

            *theta += ALPHA * m_hat / (v_hat.sqrt() + EPSILON);
        }

        Ok(numeric::scale(&self.theta, self.learning_rate))
    }

    fn time_step(&self) -> usize {
        self.t
    }
}
