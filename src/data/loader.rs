use rand::seq::SliceRandom;

use super::Batch;

/// Splits a batch of samples into mini-batches
pub struct DataLoader {
    samples: Batch,
    batch_size: usize,
    shuffle: bool,
}

impl DataLoader {
    /// Create a new DataLoader
    ///
    /// Panics if `batch_size` is zero or features and labels differ in length.
    pub fn new(samples: Batch, batch_size: usize, shuffle: bool) -> Self {
        assert_eq!(
            samples.features.len(),
            samples.labels.len(),
            "Features and labels must have same number of samples"
        );
        assert!(batch_size > 0, "Batch size must be positive");

        DataLoader {
            samples,
            batch_size,
            shuffle,
        }
    }

    /// Get the number of samples in the dataset
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of mini-batches per pass
    pub fn num_batches(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }

    /// Iterate over mini-batches, reshuffling first if requested
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        if self.shuffle {
            indices.shuffle(&mut rand::rng());
        }

        DataLoaderIterator {
            samples: &self.samples,
            batch_size: self.batch_size,
            indices,
            current_idx: 0,
        }
    }
}

/// Iterator for DataLoader that yields owned mini-batches
pub struct DataLoaderIterator<'a> {
    samples: &'a Batch,
    batch_size: usize,
    indices: Vec<usize>,
    current_idx: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_idx >= self.indices.len() {
            return None;
        }

        let end_idx = (self.current_idx + self.batch_size).min(self.indices.len());
        let chunk = &self.indices[self.current_idx..end_idx];
        self.current_idx = end_idx;

        Some(Batch {
            features: chunk.iter().map(|&i| self.samples.features[i].clone()).collect(),
            labels: chunk.iter().map(|&i| self.samples.labels[i]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize) -> Batch {
        Batch {
            features: (0..n).map(|i| vec![i as f64]).collect(),
            labels: (0..n).map(|i| 10.0 * i as f64).collect(),
        }
    }

    #[test]
    fn test_dataloader_creation() {
        let loader = DataLoader::new(samples(5), 2, false);
        assert_eq!(loader.len(), 5);
        assert_eq!(loader.batch_size(), 2);
        assert_eq!(loader.num_batches(), 3);
    }

    #[test]
    fn test_dataloader_iteration() {
        let loader = DataLoader::new(samples(5), 2, false);
        let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let first = loader.iter().next().unwrap();
        assert_eq!(first.features, vec![vec![0.0], vec![1.0]]);
        assert_eq!(first.labels, vec![0.0, 10.0]);
    }

    #[test]
    fn test_shuffled_iteration_keeps_pairs() {
        let loader = DataLoader::new(samples(20), 6, true);
        let mut seen = Vec::new();
        for batch in loader.iter() {
            for (x, y) in batch.features.iter().zip(&batch.labels) {
                assert_eq!(10.0 * x[0], *y);
                seen.push(x[0] as usize);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn test_mismatched_lengths_panic() {
        let mut batch = samples(3);
        batch.labels.pop();
        DataLoader::new(batch, 2, false);
    }
}
