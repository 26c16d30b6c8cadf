//! CART trees and bagged random forests

use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::TrainingError;

use super::candidates::Estimator;
use super::linear::argmax;

/// Decision tree node
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf(f64),
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(value) => return *value,
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature_idx] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

/// Classification (Gini, majority leaves) or regression (variance, mean leaves).
#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    Classification { n_classes: usize },
    Regression,
}

#[derive(Debug, Clone, Copy)]
struct TreeParams {
    task: Task,
    max_depth: Option<usize>,
    max_features: usize,
}

struct Split {
    feature_idx: usize,
    threshold: f64,
    impurity: f64,
}

// ---------------------------------------------------------------------------
// Tree growing
// ---------------------------------------------------------------------------

fn leaf_value(task: Task, y: &Array1<f64>, indices: &[usize]) -> f64 {
    match task {
        Task::Classification { n_classes } => {
            let mut counts = vec![0.0; n_classes];
            for &i in indices {
                counts[y[i] as usize] += 1.0;
            }
            argmax(counts.into_iter()) as f64
        }
        Task::Regression => indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64,
    }
}

fn is_pure(y: &Array1<f64>, indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| y[i] == first)
}

/// Weighted impurity of a left/right partition; lower is better.
struct ImpurityTracker {
    task: Task,
    left_counts: Vec<f64>,
    right_counts: Vec<f64>,
    left_sum: f64,
    left_sq: f64,
    right_sum: f64,
    right_sq: f64,
}

impl ImpurityTracker {
    fn new(task: Task, y: &Array1<f64>, indices: &[usize]) -> Self {
        let mut tracker = Self {
            task,
            left_counts: Vec::new(),
            right_counts: Vec::new(),
            left_sum: 0.0,
            left_sq: 0.0,
            right_sum: 0.0,
            right_sq: 0.0,
        };
        if let Task::Classification { n_classes } = task {
            tracker.left_counts = vec![0.0; n_classes];
            tracker.right_counts = vec![0.0; n_classes];
        }
        for &i in indices {
            tracker.add_right(y[i]);
        }
        tracker
    }

    fn add_right(&mut self, v: f64) {
        match self.task {
            Task::Classification { .. } => self.right_counts[v as usize] += 1.0,
            Task::Regression => {
                self.right_sum += v;
                self.right_sq += v * v;
            }
        }
    }

    fn move_left(&mut self, v: f64) {
        match self.task {
            Task::Classification { .. } => {
                self.right_counts[v as usize] -= 1.0;
                self.left_counts[v as usize] += 1.0;
            }
            Task::Regression => {
                self.right_sum -= v;
                self.right_sq -= v * v;
                self.left_sum += v;
                self.left_sq += v * v;
            }
        }
    }

    fn weighted(&self, n_left: usize, n_right: usize) -> f64 {
        match self.task {
            Task::Classification { .. } => {
                gini(&self.left_counts, n_left) * n_left as f64
                    + gini(&self.right_counts, n_right) * n_right as f64
            }
            Task::Regression => {
                let sse = |sum: f64, sq: f64, n: usize| {
                    if n == 0 {
                        0.0
                    } else {
                        sq - sum * sum / n as f64
                    }
                };
                sse(self.left_sum, self.left_sq, n_left) + sse(self.right_sum, self.right_sq, n_right)
            }
        }
    }
}

fn gini(counts: &[f64], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|c| (c / n).powi(2)).sum::<f64>()
}

fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    params: &TreeParams,
    rng: &mut ChaCha8Rng,
) -> Option<Split> {
    let n = indices.len();
    let parent = ImpurityTracker::new(params.task, y, indices).weighted(0, n);
    let mut best: Option<Split> = None;

    let n_features = x.ncols();
    let features = index::sample(rng, n_features, params.max_features.min(n_features));

    let mut sorted = indices.to_vec();
    for feature_idx in features.iter() {
        sorted.sort_by(|&a, &b| x[[a, feature_idx]].total_cmp(&x[[b, feature_idx]]));

        let mut tracker = ImpurityTracker::new(params.task, y, &sorted);
        for pos in 0..n - 1 {
            tracker.move_left(y[sorted[pos]]);
            let here = x[[sorted[pos], feature_idx]];
            let next = x[[sorted[pos + 1], feature_idx]];
            if here == next {
                continue;
            }
            let impurity = tracker.weighted(pos + 1, n - pos - 1);
            if impurity < parent - 1e-12 && best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(Split {
                    feature_idx,
                    threshold: (here + next) / 2.0,
                    impurity,
                });
            }
        }
    }
    best
}

fn grow(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: Vec<usize>,
    depth: usize,
    params: &TreeParams,
    rng: &mut ChaCha8Rng,
) -> TreeNode {
    let at_max_depth = params.max_depth.is_some_and(|max| depth >= max);
    if indices.len() < 2 || at_max_depth || is_pure(y, &indices) {
        return TreeNode::Leaf(leaf_value(params.task, y, &indices));
    }

    let Some(split) = best_split(x, y, &indices, params, rng) else {
        return TreeNode::Leaf(leaf_value(params.task, y, &indices));
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| x[[i, split.feature_idx]] <= split.threshold);

    TreeNode::Split {
        feature_idx: split.feature_idx,
        threshold: split.threshold,
        left: Box::new(grow(x, y, left, depth + 1, params, rng)),
        right: Box::new(grow(x, y, right, depth + 1, params, rng)),
    }
}

// ---------------------------------------------------------------------------
// Random forest
// ---------------------------------------------------------------------------

/// Bagged ensemble of CART trees, each split drawing `log2(d) + 1` candidate
/// features. Classification votes (lowest class index wins ties); regression
/// averages.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_estimators: usize,
    max_depth: Option<usize>,
    seed: u64,
    task: Task,
    trees: Vec<TreeNode>,
}

impl RandomForest {
    pub fn new_classifier(n_estimators: usize, n_classes: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            max_depth: None,
            seed,
            task: Task::Classification { n_classes },
            trees: Vec::new(),
        }
    }

    pub fn new_regressor(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            max_depth: None,
            seed,
            task: Task::Regression,
            trees: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn max_features(n_features: usize) -> usize {
        if n_features == 0 {
            return 0;
        }
        ((n_features as f64).log2().floor() as usize + 1).min(n_features)
    }
}

impl Estimator for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        let n_samples = x.nrows();
        if n_samples == 0 || n_samples != y.len() {
            return Err(TrainingError::NoLabelledRows);
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite("training data"));
        }

        let params = TreeParams {
            task: self.task,
            max_depth: self.max_depth,
            max_features: Self::max_features(x.ncols()),
        };

        // Build trees in parallel; each tree owns a seed derived from its index.
        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(tree_idx as u64));
                let sample: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                grow(x, y, sample, 0, &params, &mut rng)
            })
            .collect();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        if self.trees.is_empty() {
            return Err(TrainingError::NotFitted);
        }
        Ok(x.rows()
            .into_iter()
            .map(|sample| match self.task {
                Task::Classification { n_classes } => {
                    let mut votes = vec![0.0; n_classes];
                    for tree in &self.trees {
                        votes[tree.predict(sample) as usize] += 1.0;
                    }
                    argmax(votes.into_iter()) as f64
                }
                Task::Regression => {
                    self.trees.iter().map(|t| t.predict(sample)).sum::<f64>()
                        / self.trees.len() as f64
                }
            })
            .collect())
    }
}
