use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CleaningError;

// ---------------------------------------------------------------------------
// ColumnKind / Value – a single cell and the kind of its column
// ---------------------------------------------------------------------------

/// Kind of a column, inferred once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// One value slot of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Category(String),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Category(s) => Some(s),
            _ => None,
        }
    }

    /// Whether a present value agrees with `kind`. Missing fits any kind.
    pub fn fits(&self, kind: ColumnKind) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(_) => kind == ColumnKind::Numeric,
            Value::Category(_) => kind == ColumnKind::Categorical,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Category(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// In-memory table: ordered columns, ordered rows, optional target column.
///
/// Every row holds exactly one value per column, in column order. The target
/// designation is only changed through
/// [`bind_target`](crate::data::target::bind_target).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    target: Option<usize>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            target: None,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target
    }

    pub fn target(&self) -> Option<&Column> {
        self.target.and_then(|i| self.columns.get(i))
    }

    pub(crate) fn set_target(&mut self, index: usize) {
        self.target = Some(index);
    }

    /// Values of one column in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Distinct categories of a column in first-appearance order.
    pub fn categories(&self, index: usize) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for value in self.column_values(index) {
            if let Some(cat) = value.as_category() {
                if !seen.contains(&cat) {
                    seen.push(cat);
                }
            }
        }
        seen
    }

    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|v| v.is_missing())
            .count()
    }

    /// Verify the row-width and value-kind invariants.
    pub fn check_schema(&self) -> Result<(), CleaningError> {
        let width = self.columns.len();
        for (row_no, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(CleaningError::RowWidth {
                    row: row_no,
                    expected: width,
                    found: row.len(),
                });
            }
            for (value, column) in row.iter().zip(&self.columns) {
                if !value.fits(column.kind) {
                    return Err(CleaningError::KindMismatch {
                        row: row_no,
                        column: column.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
