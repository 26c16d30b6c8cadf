use crate::error::TargetNotFound;

use super::model::Dataset;

/// Designate `column_name` as the prediction target.
///
/// Exact name match. On failure the previous designation is kept.
pub fn bind_target(dataset: &mut Dataset, column_name: &str) -> Result<(), TargetNotFound> {
    match dataset.column_index(column_name) {
        Some(index) => {
            dataset.set_target(index);
            log::info!("Target column set to: {column_name}");
            Ok(())
        }
        None => {
            log::error!("Column not found: {column_name}");
            Err(TargetNotFound {
                name: column_name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    #[test]
    fn binds_existing_column() {
        let mut ds = load_reader("a,b\n1,x\n".as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "b").unwrap();
        assert_eq!(ds.target().map(|c| c.name.as_str()), Some("b"));
    }

    #[test]
    fn unknown_column_keeps_previous_target() {
        let mut ds = load_reader("a,b\n1,x\n".as_bytes(), "inline").unwrap();
        bind_target(&mut ds, "a").unwrap();

        let err = bind_target(&mut ds, "nonexistent").unwrap_err();
        assert_eq!(err.name, "nonexistent");
        assert_eq!(ds.target_index(), Some(0));
    }

    #[test]
    fn match_is_exact() {
        let mut ds = load_reader("Price\n1\n".as_bytes(), "inline").unwrap();
        assert!(bind_target(&mut ds, "price").is_err());
        assert!(ds.target().is_none());
    }
}
