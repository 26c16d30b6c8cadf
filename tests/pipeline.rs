use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rusty_predict::data::cleaner::clean;
use rusty_predict::data::loader::load_file;
use rusty_predict::data::target::bind_target;
use rusty_predict::error::{LoadError, PipelineError};
use rusty_predict::report::TextReportGenerator;
use rusty_predict::training::encode::TaskType;
use rusty_predict::training::selector::select_best;
use rusty_predict::training::trainer::ModelTrainer;
use rusty_predict::{Pipeline, PipelineConfig, Stage};

const MISSING_ROWS: [usize; 3] = [5, 50, 95];

/// 100 rows, 5 columns. `segment` is categorical with 3 blanks; after those
/// are removed "basic" is the clear majority (49 vs 24 vs 24).
fn customers_csv() -> String {
    let mut csv = String::from("age,income,score,region,segment\n");
    for i in 0..100 {
        let segment = match i % 4 {
            0 | 1 => "basic",
            2 => "standard",
            _ => "premium",
        };
        let base = match segment {
            "basic" => 20.0,
            "standard" => 50.0,
            _ => 80.0,
        };
        let score = base + (i % 7) as f64;
        let income = 20_000 + (i % 4) * 15_000 + (i * 37) % 900;
        let region = ["north", "south", "east"][i % 3];
        let segment = if MISSING_ROWS.contains(&i) { "" } else { segment };
        writeln!(csv, "{},{income},{score:.1},{region},{segment}", 20 + i % 50).unwrap();
    }
    csv
}

fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn quick_config() -> PipelineConfig {
    PipelineConfig {
        forest_trees: 15,
        ..PipelineConfig::default()
    }
}

#[test]
fn end_to_end_classification() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "customers.csv", &customers_csv());

    let raw = load_file(&path).unwrap();
    assert_eq!(raw.n_rows(), 100);
    assert_eq!(raw.n_columns(), 5);
    assert_eq!(raw.missing_count(), 3);

    let mut ds = clean(&raw);
    assert_eq!(ds.missing_count(), 0);
    let seg = ds.column_index("segment").unwrap();
    for row in MISSING_ROWS {
        assert_eq!(ds.rows[row][seg].as_category(), Some("basic"));
    }

    bind_target(&mut ds, "segment").unwrap();
    let results = ModelTrainer::new(quick_config()).train(Some(&ds));
    assert_eq!(results.task(), Some(TaskType::Classification));

    let scores = results.scores();
    let names: Vec<&str> = scores.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["Logistic Regression", "Random Forest"]);
    for (name, score) in &scores {
        assert!((0.0..=100.0).contains(score), "{name} scored {score}");
    }
    for (_, summary) in results.summaries() {
        assert!(summary.starts_with("Accuracy: "), "{summary}");
    }

    let (best_name, best_score) = if scores[1].1 > scores[0].1 {
        &scores[1]
    } else {
        &scores[0]
    };
    assert_eq!(
        select_best(&results),
        format!("{best_name} (Score: {best_score:.3})")
    );
}

fn assert_repeatable(target: &str, task: TaskType) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "customers.csv", &customers_csv());
    let mut ds = clean(&load_file(&path).unwrap());
    bind_target(&mut ds, target).unwrap();

    let trainer = ModelTrainer::new(quick_config());
    let first = trainer.train(Some(&ds));
    let second = trainer.train(Some(&ds));

    assert_eq!(first.task(), Some(task));
    assert_eq!(first, second);
    assert_eq!(select_best(&first), select_best(&second));
}

#[test]
fn regression_training_is_deterministic() {
    assert_repeatable("income", TaskType::Regression);
}

#[test]
fn classification_training_is_deterministic() {
    assert_repeatable("segment", TaskType::Classification);
}

#[test]
fn one_failing_candidate_does_not_stop_the_others() {
    let mut csv = String::from("x1,x2,label\n");
    for i in 0..40 {
        writeln!(csv, "{i},{},yes", i * 3 % 11).unwrap();
    }
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "constant.csv", &csv);

    let mut ds = clean(&load_file(&path).unwrap());
    bind_target(&mut ds, "label").unwrap();
    let results = ModelTrainer::new(quick_config()).train(Some(&ds));

    assert_eq!(results.len(), 2);
    assert!(results.get("Logistic Regression").unwrap().is_failed());
    let forest = results.get("Random Forest").unwrap();
    assert!(!forest.is_failed());
    assert!(forest.score() > 0.0);
    assert!(select_best(&results).starts_with("Random Forest (Score: "));
}

#[test]
fn header_only_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "empty.csv", "a,b,c\n");

    assert!(matches!(load_file(&path), Err(LoadError::NoRows(_))));

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    assert!(matches!(pipeline.load(&path), Err(PipelineError::Load(_))));
    assert_eq!(pipeline.stage(), Stage::Empty);
    assert!(pipeline.dataset().is_none());
}

#[test]
fn unknown_target_leaves_dataset_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "customers.csv", &customers_csv());
    let mut ds = clean(&load_file(&path).unwrap());
    bind_target(&mut ds, "segment").unwrap();
    let before = ds.clone();

    assert!(bind_target(&mut ds, "no_such_column").is_err());
    assert_eq!(ds, before);
    assert_eq!(ds.target().map(|c| c.name.as_str()), Some("segment"));
}

#[test]
fn full_pipeline_writes_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "customers.csv", &customers_csv());
    let report_dir = dir.path().join("reports");

    let mut pipeline = Pipeline::new(quick_config());
    pipeline.load(&path).unwrap();
    pipeline.clean().unwrap();
    pipeline.bind_target("segment").unwrap();
    pipeline.train().unwrap();
    let best = pipeline.select().unwrap().best_model.clone();
    let report = pipeline
        .report(&TextReportGenerator::new(&report_dir))
        .unwrap()
        .to_path_buf();

    assert_eq!(pipeline.stage(), Stage::Reported);
    assert!(report.starts_with(&report_dir));
    let text = std::fs::read_to_string(report).unwrap();
    assert!(text.contains("Total Rows: 100"));
    assert!(text.contains("Logistic Regression: Accuracy: "));
    assert!(text.contains(&format!("Best Model: {best}")));
}
