//! Seeded k-fold splitting

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::TrainingError;

/// A single train/test split
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// K-fold splitter with deterministic fold assignment.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
    seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    fn check(&self, n_samples: usize) -> Result<(), TrainingError> {
        if self.n_splits < 2 || n_samples < self.n_splits {
            return Err(TrainingError::TooFewRows {
                rows: n_samples,
                folds: self.n_splits,
            });
        }
        Ok(())
    }

    fn shuffled(&self, n_samples: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        indices
    }

    /// Shuffle once, then cut into contiguous folds. The first
    /// `n_samples % n_splits` folds take one extra sample.
    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>, TrainingError> {
        self.check(n_samples)?;
        let indices = self.shuffled(n_samples);

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;
        let mut assignment = vec![0; n_samples];
        let mut current = 0;
        for fold_idx in 0..self.n_splits {
            let fold_size = if fold_idx < remainder { base + 1 } else { base };
            for &idx in &indices[current..current + fold_size] {
                assignment[idx] = fold_idx;
            }
            current += fold_size;
        }
        Ok(self.folds_from_assignment(&indices, &assignment))
    }

    /// Like [`split`](Self::split) but spreads every class across the folds
    /// round-robin, so each fold keeps roughly the overall class balance.
    pub fn split_stratified(&self, labels: &[usize]) -> Result<Vec<Fold>, TrainingError> {
        self.check(labels.len())?;
        let indices = self.shuffled(labels.len());

        // Ordered map so the fold layout does not depend on hash order.
        let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &idx in &indices {
            by_class.entry(labels[idx]).or_default().push(idx);
        }

        let mut assignment = vec![0; labels.len()];
        for (pos, idx) in by_class.into_values().flatten().enumerate() {
            assignment[idx] = pos % self.n_splits;
        }
        Ok(self.folds_from_assignment(&indices, &assignment))
    }

    fn folds_from_assignment(&self, order: &[usize], assignment: &[usize]) -> Vec<Fold> {
        (0..self.n_splits)
            .map(|fold_idx| {
                let (test_indices, train_indices) =
                    order.iter().partition(|&&idx| assignment[idx] == fold_idx);
                Fold {
                    train_indices,
                    test_indices,
                    fold_idx,
                }
            })
            .collect()
    }
}
