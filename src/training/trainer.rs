use ndarray::Axis;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::model::Dataset;
use crate::error::TrainingError;

use super::candidates::Candidate;
use super::cv::{Fold, KFold};
use super::encode::{encode, Encoded, TaskType};
use super::metrics;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CandidateOutcome {
    Scored { score: f64, summary: String },
    Failed { reason: String },
}

impl CandidateOutcome {
    /// Ranking score; a failed candidate counts as 0.0.
    pub fn score(&self) -> f64 {
        match self {
            CandidateOutcome::Scored { score, .. } => *score,
            CandidateOutcome::Failed { .. } => 0.0,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            CandidateOutcome::Scored { summary, .. } => summary.clone(),
            CandidateOutcome::Failed { reason } => format!("Training failed: {reason}"),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CandidateOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub name: String,
    pub outcome: CandidateOutcome,
}

/// Per-candidate outcomes of one training run, in training order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationResults {
    task: Option<TaskType>,
    entries: Vec<CandidateResult>,
}

impl EvaluationResults {
    pub fn new(task: TaskType) -> Self {
        Self {
            task: Some(task),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, outcome: CandidateOutcome) {
        self.entries.push(CandidateResult {
            name: name.into(),
            outcome,
        });
    }

    /// `None` for the empty result of a run that never started.
    pub fn task(&self) -> Option<TaskType> {
        self.task
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateResult> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CandidateOutcome> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, score)` pairs in training order.
    pub fn scores(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.outcome.score()))
            .collect()
    }

    /// `(name, summary)` pairs in training order.
    pub fn summaries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.outcome.summary()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Trainer
// ---------------------------------------------------------------------------

/// Trains the candidate battery with seeded k-fold cross-validation.
#[derive(Debug, Clone)]
pub struct ModelTrainer {
    config: PipelineConfig,
}

impl ModelTrainer {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Train every candidate. Precondition failures (no dataset, no target)
    /// are logged and produce an empty result.
    pub fn train(&self, dataset: Option<&Dataset>) -> EvaluationResults {
        let result = dataset
            .ok_or(TrainingError::NoDataset)
            .and_then(|ds| self.try_train(ds));
        match result {
            Ok(results) => results,
            Err(e) => {
                log::error!("Data not properly set up for training: {e}");
                EvaluationResults::default()
            }
        }
    }

    /// Like [`train`](Self::train), but returns precondition failures.
    /// Anything that goes wrong after that is recorded per candidate.
    pub fn try_train(&self, dataset: &Dataset) -> Result<EvaluationResults, TrainingError> {
        let target = dataset.target().ok_or(TrainingError::NoTarget)?;
        let task = TaskType::for_kind(target.kind);
        log::info!("Training {task} models for target '{}'...", target.name);

        let mut results = EvaluationResults::new(task);
        let prepared = encode(dataset).and_then(|data| {
            let folds = self.folds(&data)?;
            Ok((data, folds))
        });

        for &candidate in Candidate::battery(task) {
            let outcome = match &prepared {
                Ok((data, folds)) => match self.evaluate(candidate, data, folds) {
                    Ok(scored) => scored,
                    Err(e) => CandidateOutcome::Failed { reason: e.to_string() },
                },
                Err(e) => CandidateOutcome::Failed { reason: e.to_string() },
            };
            match &outcome {
                CandidateOutcome::Failed { reason } => {
                    log::error!("Error training {}: {reason}", candidate.name())
                }
                scored => log::info!("{} - {}", candidate.name(), scored.summary()),
            }
            results.push(candidate.name(), outcome);
        }
        Ok(results)
    }

    fn folds(&self, data: &Encoded) -> Result<Vec<Fold>, TrainingError> {
        let kfold = KFold::new(self.config.folds, self.config.seed);
        match data.task {
            TaskType::Classification => kfold.split_stratified(&data.labels()),
            TaskType::Regression => kfold.split(data.n_samples()),
        }
    }

    /// Cross-validate one candidate. Folds run in parallel; predictions are
    /// pooled in fold order before scoring.
    fn evaluate(
        &self,
        candidate: Candidate,
        data: &Encoded,
        folds: &[Fold],
    ) -> Result<CandidateOutcome, TrainingError> {
        let per_fold: Vec<(Vec<usize>, Vec<f64>)> = folds
            .par_iter()
            .map(|fold| -> Result<(Vec<usize>, Vec<f64>), TrainingError> {
                let x_train = data.x.select(Axis(0), &fold.train_indices);
                let y_train = data.y.select(Axis(0), &fold.train_indices);
                let x_test = data.x.select(Axis(0), &fold.test_indices);

                let mut model = candidate.build(&self.config, data.n_classes(), fold.fold_idx);
                model.fit(&x_train, &y_train)?;
                let predicted = model.predict(&x_test)?;
                Ok((fold.test_indices.clone(), predicted.to_vec()))
            })
            .collect::<Result<_, _>>()?;

        let (tested, predicted): (Vec<usize>, Vec<f64>) = per_fold
            .into_iter()
            .flat_map(|(idx, pred)| idx.into_iter().zip(pred))
            .unzip();
        if predicted.iter().any(|p| !p.is_finite()) {
            return Err(TrainingError::NonFinite("predictions"));
        }

        Ok(match data.task {
            TaskType::Classification => {
                let actual: Vec<usize> = tested.iter().map(|&i| data.y[i] as usize).collect();
                let predicted: Vec<usize> = predicted.iter().map(|&p| p as usize).collect();
                let m = metrics::classification(&actual, &predicted, data.n_classes());
                CandidateOutcome::Scored {
                    score: m.pct_correct,
                    summary: m.summary(),
                }
            }
            TaskType::Regression => {
                let actual: Vec<f64> = tested.iter().map(|&i| data.y[i]).collect();
                let m = metrics::regression(&actual, &predicted);
                CandidateOutcome::Scored {
                    score: m.correlation,
                    summary: m.summary(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use crate::data::target::bind_target;

    fn quick_config() -> PipelineConfig {
        PipelineConfig {
            folds: 5,
            forest_trees: 10,
            logistic_max_iter: 100,
            ..PipelineConfig::default()
        }
    }

    fn linear_csv(rows: usize) -> String {
        let mut csv = String::from("x1,x2,y\n");
        for i in 0..rows {
            let x1 = i as f64;
            let x2 = ((i * 7) % 5) as f64;
            csv.push_str(&format!("{x1},{x2},{}\n", 3.0 * x1 - x2 + 1.0));
        }
        csv
    }

    #[test]
    fn test_regression_battery() {
        let mut ds = load_reader(linear_csv(30).as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "y").unwrap();

        let results = ModelTrainer::new(quick_config()).try_train(&ds).unwrap();
        assert_eq!(results.task(), Some(TaskType::Regression));
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Linear Regression", "Random Forest (Regression)"]);

        let linear = results.get("Linear Regression").unwrap();
        assert!(linear.score() > 0.99, "{linear:?}");
        assert!(linear.summary().starts_with("Correlation: "));
    }

    #[test]
    fn test_missing_target_gives_empty_results() {
        let ds = load_reader(linear_csv(30).as_bytes(), "inline").unwrap();
        let trainer = ModelTrainer::new(quick_config());

        assert_eq!(trainer.try_train(&ds).unwrap_err(), TrainingError::NoTarget);
        assert!(trainer.train(Some(&ds)).is_empty());
        assert!(trainer.train(None).is_empty());
    }

    #[test]
    fn test_too_few_rows_fails_every_candidate() {
        let mut ds = load_reader(linear_csv(3).as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "y").unwrap();

        let results = ModelTrainer::new(quick_config()).try_train(&ds).unwrap();
        assert_eq!(results.len(), 2);
        for r in results.iter() {
            assert!(r.outcome.is_failed());
            assert_eq!(r.outcome.score(), 0.0);
            assert!(r.outcome.summary().starts_with("Training failed: cannot make 5 folds"));
        }
    }

    #[test]
    fn test_single_class_only_fails_logistic() {
        let mut csv = String::from("a,b,label\n");
        for i in 0..20 {
            csv.push_str(&format!("{i},{},same\n", i % 4));
        }
        let mut ds = load_reader(csv.as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "label").unwrap();

        let results = ModelTrainer::new(quick_config()).try_train(&ds).unwrap();
        assert!(results.get("Logistic Regression").unwrap().is_failed());

        let forest = results.get("Random Forest").unwrap();
        assert!(!forest.is_failed());
        assert_eq!(forest.score(), 100.0);
    }
}
