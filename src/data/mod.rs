//! Synthetic training data for frecency regression

mod frecency;
mod loader;

pub use frecency::{Category, FrecencyConfig, FrecencyGenerator, PARALLEL_THRESHOLD};
pub use loader::DataLoader;

use rand::Rng;

/// Labeled feature rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Source of labeled samples
pub trait DataGenerator {
    /// Draw `n` labeled rows using `rng`
    fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Batch;

    /// Width of every feature row
    fn num_categories(&self) -> usize;

    /// Draw `n` labeled rows from the thread-local RNG
    fn sample(&self, n: usize) -> Batch {
        self.sample_with(&mut rand::rng(), n)
    }
}

/// One-hot encode category indices
///
/// Panics if an index is not below `num_choices`.
pub fn one_hot(num_choices: usize, indices: &[usize]) -> Vec<Vec<f64>> {
    indices
        .iter()
        .map(|&idx| {
            assert!(idx < num_choices, "category {idx} out of range for {num_choices} choices");
            let mut row = vec![0.0; num_choices];
            row[idx] = 1.0;
            row
        })
        .collect()
}

/// Concatenate the rows of several groups
pub fn flatten(groups: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    groups.iter().flat_map(|group| group.iter().cloned()).collect()
}

/// Center every row by the column mean over all groups
pub fn normalize(groups: &[Vec<Vec<f64>>]) -> Vec<Vec<Vec<f64>>> {
    let rows = flatten(groups);
    let Some(width) = rows.first().map(Vec::len) else {
        return groups.to_vec();
    };

    let mut mean = vec![0.0; width];
    for row in &rows {
        for (m, &x) in mean.iter_mut().zip(row) {
            *m += x;
        }
    }
    let n = rows.len() as f64;
    mean.iter_mut().for_each(|m| *m /= n);

    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|row| row.iter().zip(&mean).map(|(x, m)| x - m).collect())
                .collect()
        })
        .collect()
}
