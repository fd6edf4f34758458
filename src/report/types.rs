use chrono::Local;
use serde::{Deserialize, Serialize};

/// Outcome of a single scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Passed,
    Failed,
}

/// Recorded outcome of one (category, difficulty) scenario run.
///
/// Created at run start with status FAILED and score "N/A", finalized exactly
/// once by that run, and never mutated after being appended to the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub category: String,
    pub difficulty: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: TestStatus,
    pub score: String,
    pub error: Option<String>,
}

impl TestResult {
    pub fn begin(category: &str, difficulty: &str) -> Self {
        Self {
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            start_time: now_stamp(),
            end_time: None,
            status: TestStatus::Failed,
            score: "N/A".to_string(),
            error: None,
        }
    }

    pub fn pass(&mut self, score: String) {
        self.status = TestStatus::Passed;
        self.score = score;
    }

    pub fn fail(&mut self, error: String) {
        self.status = TestStatus::Failed;
        self.error = Some(error);
    }

    pub fn finish(&mut self) {
        self.end_time = Some(now_stamp());
    }
}

/// Aggregate header of a generated report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    pub generated_on: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
}

/// Persisted report: aggregate counts plus the literal run history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    pub report_info: ReportInfo,
    pub test_cases: Vec<TestResult>,
}

impl QuizReport {
    /// Build the aggregate over a snapshot of the run history.
    ///
    /// Invariant: `total_tests == passed_tests + failed_tests`, which holds
    /// because every result is either PASSED or FAILED.
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results
            .iter()
            .filter(|r| r.status == TestStatus::Passed)
            .count();

        Self {
            report_info: ReportInfo {
                generated_on: now_stamp(),
                total_tests: results.len(),
                passed_tests: passed,
                failed_tests: results.len() - passed,
            },
            test_cases: results.to_vec(),
        }
    }
}

fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_counts_balance() {
        let mut passed = TestResult::begin("math", "easy");
        passed.pass("2/3".to_string());
        passed.finish();

        let mut failed = TestResult::begin("gk", "medium");
        failed.fail("First question is not displayed".to_string());
        failed.finish();

        let report = QuizReport::from_results(&[passed, failed.clone(), failed]);
        assert_eq!(report.report_info.total_tests, 3);
        assert_eq!(report.report_info.passed_tests, 1);
        assert_eq!(report.report_info.failed_tests, 2);
        assert_eq!(
            report.report_info.total_tests,
            report.report_info.passed_tests + report.report_info.failed_tests
        );
    }

    #[test]
    fn status_serializes_uppercase() {
        let mut result = TestResult::begin("math", "easy");
        result.pass("3/3".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "PASSED");
        assert_eq!(json["score"], "3/3");

        let result = TestResult::begin("math", "hard");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["score"], "N/A");
    }
}
