use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

use super::model::{Column, ColumnKind, Dataset, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a comma-separated file into a [`Dataset`].
///
/// The first record is the header. A column is numeric when every
/// non-missing value parses as a finite number, categorical otherwise.
/// Empty fields (and the `?` marker) are missing values.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file, &path.display().to_string())?;
    log::info!(
        "Loaded {} rows and {} columns from {}",
        dataset.n_rows(),
        dataset.n_columns(),
        path.display()
    );
    Ok(dataset)
}

fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Parse CSV text from any reader. `source` only labels error messages.
pub fn load_reader<R: Read>(reader: R, source: &str) -> Result<Dataset, LoadError> {
    let text = std::io::read_to_string(reader).map_err(csv::Error::from)?;

    let headers: Vec<String> = csv_reader(&text)
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeader(source.to_string()));
    }

    let body = if headers.len() == 1 {
        Cow::Owned(mark_blank_lines(&text))
    } else {
        Cow::Borrowed(text.as_str())
    };
    let mut reader = csv_reader(&body);
    reader.headers()?;

    let mut seen = HashSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            return Err(LoadError::DuplicateColumn(name.clone()));
        }
    }

    // Raw text first: kinds are only known once every value has been seen.
    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        raw_rows.push(
            record
                .iter()
                .map(|field| (!is_missing_marker(field)).then(|| field.to_string()))
                .collect(),
        );
    }

    if raw_rows.is_empty() {
        return Err(LoadError::NoRows(source.to_string()));
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_kind(raw_rows.iter().map(|row| row[col].as_deref())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(field, kind)| to_value(field, *kind))
                .collect()
        })
        .collect();

    let columns = headers
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| Column { name, kind })
        .collect();

    Ok(Dataset::new(columns, rows))
}

/// The csv reader skips blank lines, but in a single-column file a blank
/// data line is a row whose only value is missing. Rewrite those as `""`.
/// One trailing line break ends the last row and adds nothing.
fn mark_blank_lines(text: &str) -> String {
    let body = text
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text);

    let mut out = String::with_capacity(text.len() + 16);
    let mut seen_header = false;
    for line in body.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            if seen_header {
                out.push_str("\"\"");
            }
        } else {
            seen_header = true;
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Kind inference helpers
// ---------------------------------------------------------------------------

fn is_missing_marker(field: &str) -> bool {
    field.is_empty() || field == "?"
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn infer_kind<'a>(mut values: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    if values.all(|v| v.map_or(true, |s| parse_number(s).is_some())) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn to_value(field: Option<String>, kind: ColumnKind) -> Value {
    match (field, kind) {
        (None, _) => Value::Missing,
        (Some(s), ColumnKind::Numeric) => parse_number(&s).map_or(Value::Missing, Value::Number),
        (Some(s), ColumnKind::Categorical) => Value::Category(s),
    }
}
