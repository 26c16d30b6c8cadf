use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui;
use rusty_predict::data::stats::Statistics;
use rusty_predict::report::TextReportGenerator;
use rusty_predict::training::encode::TaskType;
use rusty_predict::{Pipeline, PipelineConfig, Stage};

use crate::color::ModelColors;

// ---------------------------------------------------------------------------
// Background jobs
// ---------------------------------------------------------------------------

/// A pipeline step run off the UI thread.
#[derive(Debug, Clone)]
pub enum Job {
    Load(PathBuf),
    Clean,
    Train { target: String },
    Report,
}

impl Job {
    fn label(&self) -> &'static str {
        match self {
            Job::Load(_) => "Loading data",
            Job::Clean => "Cleaning data",
            Job::Train { .. } => "Training models",
            Job::Report => "Generating report",
        }
    }
}

/// Sent back by the worker. Carries the pipeline home again.
struct JobDone {
    pipeline: Pipeline,
    lines: Vec<String>,
    error: Option<String>,
}

/// Run one step and describe what happened, as lines for the results log.
fn run_job(pipeline: &mut Pipeline, job: Job) -> (Vec<String>, Option<String>) {
    let mut lines = Vec::new();
    let result = match job {
        Job::Load(path) => pipeline.load(&path).map(|()| {
            lines.push("Data loaded successfully!".to_string());
        }),
        Job::Clean => pipeline.clean().map(|()| {
            lines.push("\n=== DATA ANALYSIS ===".to_string());
            for (label, value) in pipeline.statistics().iter() {
                lines.push(format!("{label}: {value}"));
            }
            lines.push("\nReady to train models!".to_string());
        }),
        Job::Train { target } => {
            lines.push("\n=== MODEL TRAINING ===".to_string());
            lines.push(format!("Target column: {target}"));
            pipeline
                .bind_target(&target)
                .and_then(|()| pipeline.train().map(|_| ()))
                .and_then(|()| pipeline.select().map(|o| o.clone()))
                .map(|outcome| {
                    lines.push(format!("Task: {}", outcome.task));
                    for (name, summary) in outcome.results.summaries() {
                        lines.push(format!("{name}: {summary}"));
                    }
                    lines.push(format!("\nBest Model: {}", outcome.best_model));
                })
        }
        Job::Report => {
            lines.push("\n=== GENERATING REPORT ===".to_string());
            let generator = TextReportGenerator::new(pipeline.config().report_dir.clone());
            pipeline.report(&generator).map(|path| {
                lines.push(format!("Report saved to: {}", path.display()));
                lines.push("Analysis complete!".to_string());
            })
        }
    };

    for diagnostic in pipeline.take_diagnostics() {
        lines.push(format!("Warning: {diagnostic}"));
    }
    let error = result.err().map(|e| {
        log::error!("{e}");
        format!("Error: {e}")
    });
    (lines, error)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The pipeline is moved into a worker thread for each job and comes back
/// over a channel, so `pipeline` is `None` exactly while a job is running.
pub struct AppState {
    config: PipelineConfig,
    pipeline: Option<Pipeline>,
    running: Option<Receiver<JobDone>>,

    /// Path typed or picked by the user.
    pub file_path: String,
    /// Column offered as prediction target.
    pub target: Option<String>,

    // Snapshot of the pipeline for rendering while it is away on a job.
    pub stage: Stage,
    pub columns: Vec<String>,
    pub stats: Statistics,
    pub task: Option<TaskType>,
    pub summaries: Vec<(String, String)>,
    pub scores: Vec<(String, f64)>,
    pub best_model: Option<String>,
    pub colors: ModelColors,

    /// Results log shown in the central panel.
    pub log: Vec<String>,
    /// Last error, shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            pipeline: Some(Pipeline::new(config.clone())),
            config,
            running: None,
            file_path: String::new(),
            target: None,
            stage: Stage::Empty,
            columns: Vec::new(),
            stats: Statistics::default(),
            task: None,
            summaries: Vec::new(),
            scores: Vec::new(),
            best_model: None,
            colors: ModelColors::default(),
            log: Vec::new(),
            status_message: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    pub fn can_clean(&self) -> bool {
        !self.is_busy() && self.stage == Stage::Loaded
    }

    pub fn can_train(&self) -> bool {
        !self.is_busy() && self.stage >= Stage::Cleaned && self.target.is_some()
    }

    pub fn can_report(&self) -> bool {
        !self.is_busy() && self.stage >= Stage::Selected
    }

    /// Hand the pipeline to a worker thread. Ignored while another job runs.
    pub fn start(&mut self, job: Job, ctx: &egui::Context) {
        let Some(mut pipeline) = self.pipeline.take() else {
            log::warn!("{} ignored: another job is running", job.label());
            return;
        };

        self.log.push(format!("{}...", job.label()));
        self.status_message = None;

        let (tx, rx) = mpsc::channel();
        self.running = Some(rx);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let (lines, error) = run_job(&mut pipeline, job);
            if tx.send(JobDone { pipeline, lines, error }).is_err() {
                log::warn!("UI went away before the job finished");
            }
            ctx.request_repaint();
        });
    }

    /// Collect a finished job, if any. Called once per frame.
    pub fn poll(&mut self) {
        let Some(rx) = &self.running else {
            return;
        };
        let done = match rx.try_recv() {
            Ok(done) => done,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::error!("Worker thread stopped without reporting back");
                self.running = None;
                self.pipeline = Some(Pipeline::new(self.config.clone()));
                self.status_message = Some("Error: background job crashed; start again".into());
                self.refresh();
                return;
            }
        };

        self.running = None;
        self.pipeline = Some(done.pipeline);
        self.log.extend(done.lines);
        if let Some(error) = done.error {
            self.log.push(error.clone());
            self.status_message = Some(error);
        }
        self.refresh();
    }

    /// Rebuild the render snapshot from the pipeline.
    fn refresh(&mut self) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };

        self.stage = pipeline.stage();
        self.stats = pipeline.statistics();
        self.columns = pipeline
            .dataset()
            .map(|ds| ds.column_names().map(str::to_string).collect())
            .unwrap_or_default();
        if !self.target.as_ref().is_some_and(|t| self.columns.contains(t)) {
            self.target = self.columns.last().cloned();
        }

        let results = pipeline.results();
        self.task = results.task();
        self.summaries = results.summaries();
        self.scores = results.scores();
        self.colors = ModelColors::new(self.scores.iter().map(|(name, _)| name.as_str()));
        self.best_model = pipeline.outcome().map(|o| o.best_model.clone());
    }
}
