//! Predictive analytics pipeline: load a CSV, impute missing values, bind a
//! target column, cross-validate a fixed battery of models and pick the best.
//!
//! The desktop front end lives in the `rusty-predict` binary; everything
//! here is synchronous and UI-free.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod training;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, Stage, TrainingOutcome};
