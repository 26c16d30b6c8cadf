use std::collections::HashMap;

use crate::error::CleaningError;

use super::model::{ColumnKind, Dataset, Value};

/// Impute missing values: column mean for numeric columns, column mode for
/// categorical ones (ties go to the value seen first).
///
/// Never fails. If the dataset violates its own schema the failure is logged
/// and an unmodified copy of the input is returned.
pub fn clean(dataset: &Dataset) -> Dataset {
    clean_or_keep(dataset).0
}

/// [`clean`], also handing back why the input was kept, if it was.
pub fn clean_or_keep(dataset: &Dataset) -> (Dataset, Option<CleaningError>) {
    match try_clean(dataset) {
        Ok(cleaned) => (cleaned, None),
        Err(e) => {
            log::error!("Error cleaning data, keeping it uncleaned: {e}");
            (dataset.clone(), Some(e))
        }
    }
}

/// Fallible core of [`clean`]. Columns without any present value are left
/// as they are.
pub fn try_clean(dataset: &Dataset) -> Result<Dataset, CleaningError> {
    dataset.check_schema()?;

    let fills: Vec<Option<Value>> = (0..dataset.n_columns())
        .map(|col| match dataset.columns[col].kind {
            ColumnKind::Numeric => column_mean(dataset, col).map(Value::Number),
            ColumnKind::Categorical => column_mode(dataset, col).map(Value::Category),
        })
        .collect();

    let mut imputed = 0usize;
    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&fills)
                .map(|(value, fill)| match (value, fill) {
                    (Value::Missing, Some(fill)) => {
                        imputed += 1;
                        fill.clone()
                    }
                    _ => value.clone(),
                })
                .collect()
        })
        .collect();

    let mut cleaned = dataset.clone();
    cleaned.rows = rows;
    log::info!("Data cleaned successfully ({imputed} values imputed)");
    Ok(cleaned)
}

fn column_mean(dataset: &Dataset, col: usize) -> Option<f64> {
    let (sum, n) = dataset
        .column_values(col)
        .filter_map(Value::as_f64)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn column_mode(dataset: &Dataset, col: usize) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for cat in dataset.column_values(col).filter_map(Value::as_category) {
        let count = counts.entry(cat).or_insert(0);
        if *count == 0 {
            order.push(cat);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for cat in order {
        let count = counts[cat];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((cat, count));
        }
    }
    best.map(|(cat, _)| cat.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dirty() -> Dataset {
        Dataset::new(
            vec![
                Column { name: "x".into(), kind: ColumnKind::Numeric },
                Column { name: "c".into(), kind: ColumnKind::Categorical },
                Column { name: "empty".into(), kind: ColumnKind::Numeric },
            ],
            vec![
                vec![Value::Number(1.0), Value::Category("b".into()), Value::Missing],
                vec![Value::Missing, Value::Category("a".into()), Value::Missing],
                vec![Value::Number(5.0), Value::Missing, Value::Missing],
                vec![Value::Number(3.0), Value::Category("a".into()), Value::Missing],
                vec![Value::Missing, Value::Category("b".into()), Value::Missing],
            ],
        )
    }

    #[test]
    fn imputes_mean_and_mode() {
        let cleaned = clean(&dirty());
        assert_eq!(cleaned.rows[1][0], Value::Number(3.0));
        assert_eq!(cleaned.rows[4][0], Value::Number(3.0));
        // "b" and "a" both appear twice; "b" was seen first.
        assert_eq!(cleaned.rows[2][1], Value::Category("b".into()));
    }

    #[test]
    fn all_missing_column_is_left_alone() {
        let cleaned = clean(&dirty());
        assert!(cleaned.column_values(2).all(Value::is_missing));
        assert_eq!(cleaned.missing_count(), 5);
    }

    #[test]
    fn schema_is_preserved() {
        let ds = dirty();
        let cleaned = clean(&ds);
        assert_eq!(cleaned.columns, ds.columns);
        assert_eq!(cleaned.n_rows(), ds.n_rows());
        assert_eq!(cleaned.target_index(), ds.target_index());
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean(&dirty());
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn broken_schema_falls_back_to_input() {
        let mut ds = dirty();
        ds.rows[3].pop();
        assert!(matches!(try_clean(&ds), Err(CleaningError::RowWidth { row: 3, .. })));
        assert_eq!(clean(&ds), ds);
    }

    #[test]
    fn fallback_reports_the_cause() {
        let mut ds = dirty();
        ds.rows[1][0] = Value::Category("oops".into());

        let (kept, cause) = clean_or_keep(&ds);
        assert_eq!(kept, ds);
        assert_eq!(
            cause,
            Some(CleaningError::KindMismatch { row: 1, column: "x".into() })
        );

        let (cleaned, cause) = clean_or_keep(&dirty());
        assert_eq!(cause, None);
        assert_eq!(cleaned, clean(&dirty()));
    }
}
