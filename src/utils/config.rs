use std::path::{Path, PathBuf};

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the quiz application under test
    pub base_url: String,

    /// Timeout for element waits (ms)
    pub wait_timeout_ms: u64,

    /// Poll interval for condition-based waits (ms)
    pub poll_interval_ms: u64,

    /// Timeout for the initial app readiness probe (ms)
    pub startup_timeout_ms: u64,

    /// Root directory for screenshots, logs and reports
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let base_url =
            std::env::var("QUIZ_BASE_URL").unwrap_or_else(|_| "http://localhost:9000".to_string());

        Self {
            base_url,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
            startup_timeout_ms: 30_000,
            output_dir: PathBuf::from("./output"),
        }
    }
}

impl RunnerConfig {
    pub fn screenshots_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.output_dir.join("test_logs")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("test_reports")
    }

    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = dir.to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_layout_is_rooted_at_output_dir() {
        let config = RunnerConfig::default().with_output_dir(Path::new("/tmp/quiz-out"));
        assert_eq!(config.screenshots_dir(), Path::new("/tmp/quiz-out/screenshots"));
        assert_eq!(config.logs_dir(), Path::new("/tmp/quiz-out/test_logs"));
        assert_eq!(config.reports_dir(), Path::new("/tmp/quiz-out/test_reports"));
    }
}
