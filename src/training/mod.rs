/// Model training: encoding, cross-validation, candidate models, selection.
///
/// ```text
///   target-bound Dataset
///        │
///        ▼
///   encode ──► x (one-hot features), y (class index / value)
///        │
///        ▼
///   cv::KFold (seeded, stratified for classes)
///        │
///        ▼
///   trainer ──► per candidate: fit on 9 folds, predict the 10th, pool, score
///        │
///        ▼
///   selector ──► "Name (Score: x.xxx)"
/// ```

pub mod candidates;
pub mod cv;
pub mod encode;
pub mod forest;
pub mod linear;
pub mod metrics;
pub mod selector;
pub mod trainer;
