use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::cleaner::clean_or_keep;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::stats::{summarize, Statistics};
use crate::data::target::bind_target;
use crate::error::PipelineError;
use crate::report::ReportGenerator;
use crate::training::encode::TaskType;
use crate::training::selector::select_best;
use crate::training::trainer::{EvaluationResults, ModelTrainer};

// ---------------------------------------------------------------------------
// Stage – how far the pipeline has got
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Empty,
    Loaded,
    Cleaned,
    TargetBound,
    Trained,
    Selected,
    Reported,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empty => "empty",
            Stage::Loaded => "loaded",
            Stage::Cleaned => "cleaned",
            Stage::TargetBound => "target-bound",
            Stage::Trained => "trained",
            Stage::Selected => "selected",
            Stage::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Result of a completed training run, handed to report generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingOutcome {
    pub task: TaskType,
    pub results: EvaluationResults,
    pub best_model: String,
}

// ---------------------------------------------------------------------------
// Pipeline – owns the dataset as it moves through the stages
// ---------------------------------------------------------------------------

/// Load → Clean → bind target → Train → Select → Report.
///
/// Each step checks that the previous one completed. A failing step leaves
/// the pipeline in the last stage it reached. Absorbed failures (cleaning
/// fallback, failed candidates) are collected as diagnostics.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    stage: Stage,
    dataset: Option<Dataset>,
    results: EvaluationResults,
    outcome: Option<TrainingOutcome>,
    report_path: Option<PathBuf>,
    diagnostics: Vec<String>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            stage: Stage::Empty,
            dataset: None,
            results: EvaluationResults::default(),
            outcome: None,
            report_path: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn results(&self) -> &EvaluationResults {
        &self.results
    }

    pub fn outcome(&self) -> Option<&TrainingOutcome> {
        self.outcome.as_ref()
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    pub fn statistics(&self) -> Statistics {
        summarize(self.dataset.as_ref())
    }

    /// Messages for failures that were absorbed rather than returned.
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }

    fn require(&self, min: Stage, action: &'static str) -> Result<(), PipelineError> {
        if self.stage < min {
            return Err(PipelineError::OutOfOrder {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    fn reset_downstream(&mut self) {
        self.results = EvaluationResults::default();
        self.outcome = None;
        self.report_path = None;
    }

    /// Load a file. Allowed at any stage; success discards everything
    /// downstream, failure keeps the current state.
    pub fn load(&mut self, path: &Path) -> Result<(), PipelineError> {
        let dataset = load_file(path)?;
        self.dataset = Some(dataset);
        self.reset_downstream();
        self.stage = Stage::Loaded;
        Ok(())
    }

    /// Impute missing values. A cleaning failure is absorbed: the pipeline
    /// continues with the uncleaned data and records a diagnostic.
    pub fn clean(&mut self) -> Result<(), PipelineError> {
        if self.stage != Stage::Loaded {
            return Err(PipelineError::OutOfOrder {
                action: "clean",
                stage: self.stage,
            });
        }
        let Some(dataset) = self.dataset.as_ref() else {
            return Err(PipelineError::OutOfOrder {
                action: "clean",
                stage: Stage::Empty,
            });
        };

        let (cleaned, cause) = clean_or_keep(dataset);
        if let Some(e) = cause {
            self.diagnostics
                .push(format!("Cleaning failed, using uncleaned data: {e}"));
        }
        self.dataset = Some(cleaned);
        self.stage = Stage::Cleaned;
        Ok(())
    }

    /// Choose the target column. Rebinding after training discards the
    /// previous results.
    pub fn bind_target(&mut self, column: &str) -> Result<(), PipelineError> {
        self.require(Stage::Cleaned, "bind a target")?;
        let Some(dataset) = self.dataset.as_mut() else {
            return Err(PipelineError::OutOfOrder {
                action: "bind a target",
                stage: Stage::Empty,
            });
        };
        bind_target(dataset, column)?;
        self.reset_downstream();
        self.stage = Stage::TargetBound;
        Ok(())
    }

    /// Train the candidate battery. Results from any earlier run are replaced.
    pub fn train(&mut self) -> Result<&EvaluationResults, PipelineError> {
        self.require(Stage::TargetBound, "train")?;
        let dataset = self.dataset.as_ref().ok_or(PipelineError::OutOfOrder {
            action: "train",
            stage: Stage::Empty,
        })?;

        let results = ModelTrainer::new(self.config.clone()).try_train(dataset)?;
        for entry in results.iter().filter(|e| e.outcome.is_failed()) {
            self.diagnostics
                .push(format!("{}: {}", entry.name, entry.outcome.summary()));
        }

        self.reset_downstream();
        self.results = results;
        self.stage = Stage::Trained;
        Ok(&self.results)
    }

    /// Pick the best candidate of the last run.
    pub fn select(&mut self) -> Result<&TrainingOutcome, PipelineError> {
        self.require(Stage::Trained, "select a model")?;
        let task = self.results.task().ok_or(PipelineError::OutOfOrder {
            action: "select a model",
            stage: Stage::TargetBound,
        })?;

        let best_model = select_best(&self.results);
        self.report_path = None;
        self.stage = Stage::Selected;
        Ok(&*self.outcome.insert(TrainingOutcome {
            task,
            results: self.results.clone(),
            best_model,
        }))
    }

    /// Hand statistics, summaries and the best label to `generator`.
    /// A report failure leaves the pipeline in the `Selected` stage.
    pub fn report(&mut self, generator: &dyn ReportGenerator) -> Result<&Path, PipelineError> {
        self.require(Stage::Selected, "generate a report")?;
        let outcome = self.outcome.as_ref().ok_or(PipelineError::OutOfOrder {
            action: "generate a report",
            stage: Stage::Trained,
        })?;

        let stats = summarize(self.dataset.as_ref());
        let path = generator.generate_report(
            &stats,
            &outcome.results.summaries(),
            &outcome.best_model,
        )?;
        self.stage = Stage::Reported;
        Ok(self.report_path.insert(path).as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TargetNotFound;

    fn write_csv(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("data.csv");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn stages_must_run_in_order() {
        let mut pipeline = Pipeline::new(PipelineConfig::default());
        assert!(matches!(
            pipeline.clean(),
            Err(PipelineError::OutOfOrder { stage: Stage::Empty, .. })
        ));
        assert!(matches!(pipeline.train(), Err(PipelineError::OutOfOrder { .. })));
        assert_eq!(pipeline.stage(), Stage::Empty);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(dir.path(), "a,b\n1,x\n2,y\n");

        let mut pipeline = Pipeline::new(PipelineConfig::default());
        pipeline.load(&good).unwrap();
        assert!(pipeline.load(&dir.path().join("missing.csv")).is_err());

        assert_eq!(pipeline.stage(), Stage::Loaded);
        assert_eq!(pipeline.dataset().map(Dataset::n_rows), Some(2));
    }

    #[test]
    fn unknown_target_keeps_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "a,b\n1,x\n2,y\n");

        let mut pipeline = Pipeline::new(PipelineConfig::default());
        pipeline.load(&path).unwrap();
        pipeline.clean().unwrap();
        let err = pipeline.bind_target("nope").unwrap_err();

        assert!(matches!(
            err,
            PipelineError::TargetNotFound(TargetNotFound { ref name }) if name == "nope"
        ));
        assert_eq!(pipeline.stage(), Stage::Cleaned);
        assert!(pipeline.dataset().unwrap().target().is_none());
    }
}
