use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::data::stats::Statistics;
use crate::error::ReportError;

/// Persists the outcome of an analysis somewhere and says where.
pub trait ReportGenerator {
    fn generate_report(
        &self,
        stats: &Statistics,
        summaries: &[(String, String)],
        best_model: &str,
    ) -> Result<PathBuf, ReportError>;
}

/// Writes `analysis_report_<millis>.txt` into a directory.
#[derive(Debug, Clone)]
pub struct TextReportGenerator {
    dir: PathBuf,
}

impl TextReportGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn render(
        out: &mut impl Write,
        stats: &Statistics,
        summaries: &[(String, String)],
        best_model: &str,
    ) -> std::io::Result<()> {
        writeln!(out, "Predictive Analytics Report")?;
        writeln!(out, "===========================")?;
        writeln!(out)?;
        writeln!(out, "Dataset")?;
        writeln!(out, "-------")?;
        for (label, value) in stats.iter() {
            writeln!(out, "{label}: {value}")?;
        }
        writeln!(out)?;
        writeln!(out, "Models")?;
        writeln!(out, "------")?;
        for (name, summary) in summaries {
            writeln!(out, "{name}: {summary}")?;
        }
        writeln!(out)?;
        writeln!(out, "Best Model: {best_model}")?;
        out.flush()
    }
}

impl ReportGenerator for TextReportGenerator {
    fn generate_report(
        &self,
        stats: &Statistics,
        summaries: &[(String, String)],
        best_model: &str,
    ) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let path = self.dir.join(format!("analysis_report_{millis}.txt"));

        write_file(&path, |out| Self::render(out, stats, summaries, best_model))?;
        log::info!("Report saved to: {}", path.display());
        Ok(path)
    }
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), ReportError> {
    let wrap = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    body(&mut BufWriter::new(file)).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use crate::data::stats::summarize;

    #[test]
    fn writes_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let ds = load_reader("a,b\n1,x\n".as_bytes(), "inline").unwrap();
        let stats = summarize(Some(&ds));
        let summaries = vec![("Random Forest".to_string(), "Accuracy: 90.00%".to_string())];

        let path = TextReportGenerator::new(dir.path())
            .generate_report(&stats, &summaries, "Random Forest (Score: 90.000)")
            .unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("Total Rows: 1"));
        assert!(text.contains("Column Names: a, b"));
        assert!(text.contains("Random Forest: Accuracy: 90.00%"));
        assert!(text.ends_with("Best Model: Random Forest (Score: 90.000)\n"));
    }

    #[test]
    fn unwritable_directory_is_a_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = TextReportGenerator::new(blocker.join("reports"))
            .generate_report(&Statistics::default(), &[], "none")
            .unwrap_err();
        assert!(matches!(err, ReportError::CreateDir { .. }));
    }
}
