use std::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data::model::{ColumnKind, Dataset, Value};
use crate::error::TrainingError;

/// Learning task, decided by the kind of the target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    pub fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Categorical => TaskType::Classification,
            ColumnKind::Numeric => TaskType::Regression,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Classification => write!(f, "classification"),
            TaskType::Regression => write!(f, "regression"),
        }
    }
}

/// Numeric view of a target-bound dataset.
///
/// Rows without a target value are dropped. Numeric features pass through
/// (a value still missing after cleaning becomes 0.0); categorical features
/// are one-hot encoded over every category in the dataset. For
/// classification `y` holds class indices into `classes`.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub task: TaskType,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
}

impl Encoded {
    pub fn n_samples(&self) -> usize {
        self.y.len()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class index of every sample (classification only).
    pub fn labels(&self) -> Vec<usize> {
        self.y.iter().map(|&v| v as usize).collect()
    }
}

enum Feature<'a> {
    Numeric(usize),
    OneHot(usize, &'a str),
}

pub fn encode(dataset: &Dataset) -> Result<Encoded, TrainingError> {
    let target = dataset.target_index().ok_or(TrainingError::NoTarget)?;
    let task = TaskType::for_kind(dataset.columns[target].kind);

    let mut features = Vec::new();
    let mut feature_names = Vec::new();
    for (col, column) in dataset.columns.iter().enumerate() {
        if col == target {
            continue;
        }
        match column.kind {
            ColumnKind::Numeric => {
                features.push(Feature::Numeric(col));
                feature_names.push(column.name.clone());
            }
            ColumnKind::Categorical => {
                for cat in dataset.categories(col) {
                    features.push(Feature::OneHot(col, cat));
                    feature_names.push(format!("{}={}", column.name, cat));
                }
            }
        }
    }

    let labelled: Vec<&Vec<Value>> = dataset
        .rows
        .iter()
        .filter(|row| row.get(target).is_some_and(|v| !v.is_missing()))
        .collect();
    if labelled.is_empty() {
        return Err(TrainingError::NoLabelledRows);
    }

    let classes: Vec<String> = match task {
        TaskType::Classification => dataset
            .categories(target)
            .into_iter()
            .map(str::to_string)
            .collect(),
        TaskType::Regression => Vec::new(),
    };

    let x = Array2::from_shape_fn((labelled.len(), features.len()), |(i, j)| {
        let row = labelled[i];
        match features[j] {
            Feature::Numeric(col) => row[col].as_f64().unwrap_or(0.0),
            Feature::OneHot(col, cat) => {
                if row[col].as_category() == Some(cat) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    });

    let y: Array1<f64> = labelled
        .iter()
        .map(|row| match &row[target] {
            Value::Number(v) => *v,
            Value::Category(c) => classes.iter().position(|k| k == c).unwrap_or(0) as f64,
            Value::Missing => 0.0,
        })
        .collect();

    Ok(Encoded {
        task,
        x,
        y,
        classes,
        feature_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use crate::data::target::bind_target;

    #[test]
    fn one_hot_encodes_categorical_features() {
        let csv = "size,colour,label\n1.5,red,yes\n2.0,blue,no\n3.0,red,\n";
        let mut ds = load_reader(csv.as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "label").unwrap();

        let enc = encode(&ds).unwrap();
        assert_eq!(enc.task, TaskType::Classification);
        assert_eq!(enc.feature_names, vec!["size", "colour=red", "colour=blue"]);
        // The unlabelled third row is dropped.
        assert_eq!(enc.n_samples(), 2);
        assert_eq!(enc.x.row(1).to_vec(), vec![2.0, 0.0, 1.0]);
        assert_eq!(enc.classes, vec!["yes", "no"]);
        assert_eq!(enc.labels(), vec![0, 1]);
    }

    #[test]
    fn numeric_target_is_regression() {
        let mut ds = load_reader("a,b\n1,2\n3,4\n".as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "b").unwrap();
        let enc = encode(&ds).unwrap();
        assert_eq!(enc.task, TaskType::Regression);
        assert_eq!(enc.y.to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn unbound_target_is_rejected() {
        let ds = load_reader("a,b\n1,2\n".as_bytes(), "inline").unwrap();
        assert_eq!(encode(&ds).unwrap_err(), TrainingError::NoTarget);
    }
}
