/// Data layer: core types, loading, cleaning, summarizing, target binding.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (kinds inferred)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ cleaner  │  mean / mode imputation → new Dataset
///   └──────────┘
///        │
///        ├──────────────► stats   (row / column counts for display)
///        ▼
///   ┌──────────┐
///   │  target  │  mark the column to predict (in place)
///   └──────────┘
/// ```

pub mod cleaner;
pub mod loader;
pub mod model;
pub mod stats;
pub mod target;
