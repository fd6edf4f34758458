pub mod json;
pub mod types;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use types::{QuizReport, TestStatus};

/// Print the summary of a previously generated report file.
pub fn summarize_report(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;
    let report: QuizReport =
        serde_json::from_str(&contents).with_context(|| "Failed to parse report JSON")?;

    println!(
        "\n{} Report generated on {}",
        "📊".blue(),
        report.report_info.generated_on
    );
    println!("  Total tests: {}", report.report_info.total_tests);
    println!(
        "  {} passed, {} failed",
        report.report_info.passed_tests.to_string().green(),
        report.report_info.failed_tests.to_string().red()
    );

    for case in &report.test_cases {
        let status = match case.status {
            TestStatus::Passed => "PASSED".green().bold(),
            TestStatus::Failed => "FAILED".red().bold(),
        };
        println!(
            "  [{}] {} / {} score: {}{}",
            status,
            case.category,
            case.difficulty,
            case.score,
            case.error
                .as_deref()
                .map(|e| format!(" ({})", e))
                .unwrap_or_default()
        );
    }

    Ok(())
}
