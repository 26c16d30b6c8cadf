use serde::Serialize;

use super::model::{ColumnKind, Dataset};

/// Descriptive statistics as ordered `label → text` pairs, for display and reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    entries: Vec<(String, String)>,
}

impl Statistics {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, label: &str, value: impl ToString) {
        self.entries.push((label.to_string(), value.to_string()));
    }
}

/// Summarize a dataset. `None` yields an empty [`Statistics`].
pub fn summarize(dataset: Option<&Dataset>) -> Statistics {
    let mut stats = Statistics::default();
    let Some(ds) = dataset else {
        return stats;
    };

    let numeric = ds
        .columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .count();

    stats.push("Total Rows", ds.n_rows());
    stats.push("Total Columns", ds.n_columns());
    stats.push("Numeric Columns", numeric);
    stats.push("Categorical Columns", ds.n_columns() - numeric);
    stats.push("Column Names", ds.column_names().collect::<Vec<_>>().join(", "));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    #[test]
    fn counts_columns_by_kind() {
        let ds = load_reader("id,name,height\n1,ann,1.7\n2,bob,1.8\n".as_bytes(), "inline").unwrap();
        let stats = summarize(Some(&ds));

        assert_eq!(stats.get("Total Rows"), Some("2"));
        assert_eq!(stats.get("Total Columns"), Some("3"));
        assert_eq!(stats.get("Numeric Columns"), Some("2"));
        assert_eq!(stats.get("Categorical Columns"), Some("1"));
        assert_eq!(stats.get("Column Names"), Some("id, name, height"));
    }

    #[test]
    fn absent_dataset_gives_empty_summary() {
        assert!(summarize(None).is_empty());
    }
}
