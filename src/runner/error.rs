use thiserror::Error;

/// Failure kinds for a scenario step.
///
/// Assertion failures mean the page loaded but did not show what the flow
/// expects; automation failures are session-level problems (element lookup,
/// wait timeout, navigation). Both are caught once at the
/// `run_complete_test` boundary, recorded into the TestResult, and re-raised
/// to the scenario loop.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Automation failure: {0}")]
    Automation(#[from] anyhow::Error),
}

impl StepError {
    pub fn assertion(msg: impl Into<String>) -> Self {
        StepError::Assertion(msg.into())
    }

    pub fn automation(msg: impl Into<String>) -> Self {
        StepError::Automation(anyhow::anyhow!(msg.into()))
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, StepError::Assertion(_))
    }
}

pub type StepResult<T> = Result<T, StepError>;
