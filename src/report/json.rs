use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use super::types::{QuizReport, TestResult};

/// Write a JSON report for the given run history.
///
/// Each call produces a distinct `test_report_{timestamp}.json`; when two
/// calls land in the same second a numeric suffix keeps the files apart.
pub fn write_report(results: &[TestResult], reports_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(reports_dir).with_context(|| {
        format!(
            "Failed to create reports directory: {}",
            reports_dir.display()
        )
    })?;

    let report = QuizReport::from_results(results);
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    let mut path = reports_dir.join(format!("test_report_{}.json", timestamp));
    let mut attempt = 1u32;
    while path.exists() {
        path = reports_dir.join(format!("test_report_{}_{}.json", timestamp, attempt));
        attempt += 1;
    }

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}
