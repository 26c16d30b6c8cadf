use ndarray::{Array1, Array2};

use crate::config::PipelineConfig;
use crate::error::TrainingError;

use super::encode::TaskType;
use super::forest::RandomForest;
use super::linear::{LinearRegression, LogisticRegression};

/// A model that can be fitted on one fold and predict the held-out rows.
///
/// Classifiers predict class indices as `f64`.
pub trait Estimator: Send {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError>;
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError>;
}

/// The fixed candidate battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    LogisticRegression,
    RandomForestClassifier,
    LinearRegression,
    RandomForestRegressor,
}

impl Candidate {
    /// Candidates for a task, in training order.
    pub fn battery(task: TaskType) -> &'static [Candidate] {
        match task {
            TaskType::Classification => &[Candidate::LogisticRegression, Candidate::RandomForestClassifier],
            TaskType::Regression => &[Candidate::LinearRegression, Candidate::RandomForestRegressor],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Candidate::LogisticRegression => "Logistic Regression",
            Candidate::RandomForestClassifier => "Random Forest",
            Candidate::LinearRegression => "Linear Regression",
            Candidate::RandomForestRegressor => "Random Forest (Regression)",
        }
    }

    /// Fresh, unfitted estimator for one fold.
    pub fn build(self, config: &PipelineConfig, n_classes: usize, fold_idx: usize) -> Box<dyn Estimator> {
        let forest_seed = config.seed.wrapping_mul(1_000_003).wrapping_add(fold_idx as u64 * 10_007);
        match self {
            Candidate::LogisticRegression => Box::new(LogisticRegression::new(
                n_classes,
                config.logistic_max_iter,
                config.logistic_learning_rate,
                config.ridge,
            )),
            Candidate::RandomForestClassifier => Box::new(
                RandomForest::new_classifier(config.forest_trees, n_classes, forest_seed)
                    .with_max_depth(config.forest_max_depth),
            ),
            Candidate::LinearRegression => Box::new(LinearRegression::new(config.ridge)),
            Candidate::RandomForestRegressor => Box::new(
                RandomForest::new_regressor(config.forest_trees, forest_seed)
                    .with_max_depth(config.forest_max_depth),
            ),
        }
    }
}
