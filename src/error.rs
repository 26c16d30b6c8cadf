use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// Failure to turn a source file into a [`Dataset`](crate::data::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0} has no header row")]
    NoHeader(String),
    #[error("{0} contains a header but no data rows")]
    NoRows(String),
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Internal cleaning failure. Never escapes [`clean`](crate::data::cleaner::clean):
/// the uncleaned dataset is returned instead.
#[derive(Debug, Error, PartialEq)]
pub enum CleaningError {
    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column '{column}': value does not match the column kind")]
    KindMismatch { row: usize, column: String },
}

#[derive(Debug, Error, PartialEq)]
#[error("column not found: {name}")]
pub struct TargetNotFound {
    pub name: String,
}

/// Training failures. `NoDataset` and `NoTarget` are precondition
/// violations; everything else is recorded against a single candidate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("no dataset loaded")]
    NoDataset,
    #[error("no target column bound")]
    NoTarget,
    #[error("no rows with a known target value")]
    NoLabelledRows,
    #[error("cannot make {folds} folds from {rows} rows")]
    TooFewRows { rows: usize, folds: usize },
    #[error("target has a single class ({0}); at least two are required")]
    SingleClass(String),
    #[error("normal equations are singular")]
    Singular,
    #[error("model used before fitting")]
    NotFitted,
    #[error("non-finite values encountered in {0}")]
    NonFinite(&'static str),
}

/// Selection was attempted with nothing scored.
#[derive(Debug, Error, PartialEq)]
#[error("no model trained")]
pub struct EmptyResult;

/// Report persistence failure, independent of the pipeline stages.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Pipeline-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot {action} while the pipeline is {stage}")]
    OutOfOrder { action: &'static str, stage: Stage },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    TargetNotFound(#[from] TargetNotFound),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
