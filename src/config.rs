use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File the desktop app reads its settings from, relative to the working directory.
pub const CONFIG_FILE: &str = "rusty-predict.json";

/// Tunables for training and reporting. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cross-validation folds.
    pub folds: usize,
    /// Seed for fold assignment and forest bagging.
    pub seed: u64,
    pub forest_trees: usize,
    pub forest_max_depth: Option<usize>,
    pub logistic_max_iter: usize,
    pub logistic_learning_rate: f64,
    /// L2 penalty for the linear models.
    pub ridge: f64,
    /// Directory reports are written to.
    pub report_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 1,
            forest_trees: 100,
            forest_max_depth: None,
            logistic_max_iter: 300,
            logistic_learning_rate: 0.5,
            ridge: 1e-8,
            report_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Read `path` if it exists; fall back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{ "forest_trees": 10 }"#).unwrap();
        assert_eq!(config.forest_trees, 10);
        assert_eq!(config.folds, 10);
        assert_eq!(config.seed, 1);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(PipelineConfig::load_or_default(&path), PipelineConfig::default());
    }
}
