use log::debug;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_distr::Normal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Batch, DataGenerator, one_hot};
use crate::error::{Error, Result};

/// Above this many suggestion lists, generation fans out over the rayon pool
pub const PARALLEL_THRESHOLD: usize = 1000;

const SUGGESTIONS_MEAN: f64 = 10.0;
const SUGGESTIONS_STD_DEV: f64 = 4.0;

/// One value of a categorical feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Relative sampling probability within its table
    pub weight: f64,
    /// Contribution to the frecency score
    pub points: f64,
}

impl Category {
    pub fn new(name: &str, weight: f64, points: f64) -> Self {
        Category {
            name: name.to_string(),
            weight,
            points,
        }
    }
}

/// Visit-type and recency tables the generator combines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrecencyConfig {
    pub visit_types: Vec<Category>,
    pub recency_buckets: Vec<Category>,
}

impl Default for FrecencyConfig {
    fn default() -> Self {
        FrecencyConfig {
            visit_types: vec![
                Category::new("visited", 0.6, 1.2),
                Category::new("typed", 0.2, 2.0),
                Category::new("bookmarked", 0.2, 1.4),
            ],
            recency_buckets: vec![
                Category::new("4-days", 0.15, 100.0),
                Category::new("14-days", 0.15, 70.0),
                Category::new("31-days", 0.15, 50.0),
                Category::new("90-days", 0.2, 30.0),
                Category::new("other_recency", 0.35, 10.0),
            ],
        }
    }
}

impl FrecencyConfig {
    fn validate(&self) -> Result<()> {
        let tables = [
            ("visit_types", &self.visit_types),
            ("recency_buckets", &self.recency_buckets),
        ];
        for (table, categories) in tables {
            if categories.is_empty() {
                return Err(Error::invalid_config(format!("{table} must not be empty")));
            }
            if let Some(bad) = categories
                .iter()
                .find(|c| !(c.weight >= 0.0 && c.weight.is_finite() && c.points.is_finite()))
            {
                return Err(Error::invalid_config(format!(
                    "{table}: category {:?} has weight {} and points {}",
                    bad.name, bad.weight, bad.points
                )));
            }
        }
        Ok(())
    }
}

/// Samples one-hot (visit type x recency) rows labeled with their frecency
///
/// Each combined category has the product of its two weights as probability
/// and the product of its two point values as frecency. Categories are laid
/// out type-major: every recency bucket of the first visit type comes first.
#[derive(Debug, Clone)]
pub struct FrecencyGenerator {
    names: Vec<String>,
    weights: Vec<f64>,
    points: Vec<f64>,
    categories: WeightedIndex<f64>,
    suggestion_sizes: Normal<f64>,
}

impl FrecencyGenerator {
    pub fn new(config: &FrecencyConfig) -> Result<Self> {
        config.validate()?;

        let mut names = Vec::new();
        let mut weights = Vec::new();
        let mut points = Vec::new();
        for visit in &config.visit_types {
            for recency in &config.recency_buckets {
                names.push(format!("{}/{}", visit.name, recency.name));
                weights.push(visit.weight * recency.weight);
                points.push(visit.points * recency.points);
            }
        }

        let categories = WeightedIndex::new(&weights).map_err(|e| Error::Sampling(e.to_string()))?;
        let suggestion_sizes = Normal::new(SUGGESTIONS_MEAN, SUGGESTIONS_STD_DEV)
            .map_err(|e| Error::Sampling(e.to_string()))?;

        debug!("frecency generator: {} categories", names.len());

        Ok(FrecencyGenerator {
            names,
            weights,
            points,
            categories,
            suggestion_sizes,
        })
    }

    /// Category names as `"<visit type>/<recency>"`, in feature order
    pub fn category_names(&self) -> &[String] {
        &self.names
    }

    /// Sampling probability of every category (not normalized)
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Frecency points of every category
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Frecency of a single feature row
    pub fn frecency(&self, features: &[f64]) -> f64 {
        features.iter().zip(&self.points).map(|(x, p)| x * p).sum()
    }

    fn suggestion_size<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        // Truncates toward zero once the draw is at least one
        self.suggestion_sizes.sample(rng).max(1.0) as usize
    }

    /// Draw `n` suggestion lists of normally distributed length (at least one)
    pub fn sample_suggestions_with<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<Batch> {
        (0..n)
            .map(|_| {
                let size = self.suggestion_size(rng);
                self.sample_with(rng, size)
            })
            .collect()
    }

    /// Draw `n` suggestion lists, in parallel when `n > PARALLEL_THRESHOLD`
    pub fn sample_suggestions(&self, n: usize) -> Vec<Batch> {
        if n > PARALLEL_THRESHOLD {
            debug!("sampling {n} suggestion lists in parallel");
            (0..n)
                .into_par_iter()
                .map(|_| {
                    let mut rng = rand::rng();
                    let size = self.suggestion_size(&mut rng);
                    self.sample_with(&mut rng, size)
                })
                .collect()
        } else {
            self.sample_suggestions_with(&mut rand::rng(), n)
        }
    }
}

impl DataGenerator for FrecencyGenerator {
    fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Batch {
        let indices: Vec<usize> = (0..n).map(|_| self.categories.sample(rng)).collect();
        let features = one_hot(self.names.len(), &indices);
        let labels = features.iter().map(|row| self.frecency(row)).collect();
        Batch { features, labels }
    }

    fn num_categories(&self) -> usize {
        self.names.len()
    }
}
