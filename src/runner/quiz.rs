//! Quiz flow steps and per-scenario orchestration.
//!
//! The flow is fixed: landing page, quiz setup, question loop, results view.
//! Each step asserts the target app contract (see the selectors below) and
//! captures a screenshot; `run_complete_test` ties the steps together and
//! guarantees exactly one TestResult is appended per invocation.

use chrono::Local;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::driver::traits::{BrowserDriver, Selector};
use crate::report::json::write_report;
use crate::report::types::TestResult;
use crate::runner::error::{StepError, StepResult};
use crate::runner::events::{EventEmitter, RunEvent};
use crate::utils::config::RunnerConfig;

// Target app contract
fn page_heading() -> Selector {
    Selector::tag("h1")
}
fn question_heading() -> Selector {
    Selector::tag("h3")
}
fn category_select() -> Selector {
    Selector::id("category")
}
fn difficulty_select() -> Selector {
    Selector::id("difficulty")
}
fn start_button() -> Selector {
    Selector::text("Start Quiz")
}
fn question_box() -> Selector {
    Selector::id("question-box")
}
fn answer_inputs() -> Selector {
    Selector::css("input[name=\"answer\"]")
}
fn next_button() -> Selector {
    Selector::id("nextBtn")
}
fn result_container() -> Selector {
    Selector::css(".result-container")
}
fn score_text() -> Selector {
    Selector::css(".score-box h2")
}
fn result_chart() -> Selector {
    Selector::id("chart")
}

const TITLE_MARKER: &str = "Quiz Home";
const HEADING_MARKER: &str = "Dynamic Quiz App";
const RESULTS_PATH_MARKER: &str = "/result";

/// Upper bound on the question loop; a quiz that renders answer controls
/// without ever advancing past this many questions is a broken target, not a
/// long quiz.
const MAX_QUESTIONS: u32 = 100;

pub struct QuizRunner {
    driver: Option<Box<dyn BrowserDriver>>,
    config: RunnerConfig,
    emitter: EventEmitter,
    history: Vec<TestResult>,
}

impl QuizRunner {
    pub fn new(driver: Box<dyn BrowserDriver>, config: RunnerConfig, emitter: EventEmitter) -> Self {
        Self {
            driver: Some(driver),
            config,
            emitter,
            history: Vec::new(),
        }
    }

    /// Finalized results of every run attempted so far, in order.
    pub fn history(&self) -> &[TestResult] {
        &self.history
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    fn driver(&self) -> StepResult<&dyn BrowserDriver> {
        self.driver
            .as_deref()
            .ok_or_else(|| StepError::automation("Browser session already released"))
    }

    /// Step 1: landing page shows the expected title and heading.
    pub async fn verify_landing_page(&self) -> StepResult<()> {
        log::info!("Step 1: Verifying landing page");
        let driver = self.driver()?;

        driver.goto(&self.config.base_url).await?;
        let present = driver
            .wait_for_element(&page_heading(), self.config.wait_timeout_ms)
            .await?;
        if !present {
            return Err(StepError::automation(format!(
                "Timed out waiting for the page heading at {}",
                self.config.base_url
            )));
        }

        let url = driver.current_url().await?;
        let title = driver.title().await?;
        log::info!("Current URL: {}", url);
        log::info!("Page title: {}", title);

        if !title.contains(TITLE_MARKER) {
            return Err(StepError::assertion(format!(
                "Expected '{}' in title, got: {}",
                TITLE_MARKER, title
            )));
        }

        let heading = driver.element_text(&page_heading()).await?;
        if !heading.contains(HEADING_MARKER) {
            return Err(StepError::assertion(format!(
                "Expected '{}' in heading, got: {}",
                HEADING_MARKER, heading
            )));
        }

        self.capture_step("landing_page").await?;
        log::info!("Landing page verification completed");
        Ok(())
    }

    /// Step 2: select the scenario and start the quiz.
    pub async fn start_quiz(&self, category: &str, difficulty: &str) -> StepResult<()> {
        log::info!(
            "Step 2: Starting quiz (category: {}, difficulty: {})",
            category,
            difficulty
        );
        let driver = self.driver()?;

        driver.select_value(&category_select(), category).await?;
        log::info!("Selected category: {}", category);
        driver.select_value(&difficulty_select(), difficulty).await?;
        log::info!("Selected difficulty: {}", difficulty);

        self.capture_step("quiz_setup").await?;

        driver.click(&start_button()).await?;

        let present = driver
            .wait_for_element(&question_box(), self.config.wait_timeout_ms)
            .await?;
        if !present || !driver.is_visible(&question_box()).await? {
            return Err(StepError::assertion("First question is not displayed"));
        }

        self.capture_step("quiz_started").await?;
        log::info!("Quiz started, first question displayed");
        Ok(())
    }

    /// Step 3: answer every question by picking the first option.
    ///
    /// Completion is an explicit signal: either the results view has been
    /// reached, or a question view renders zero answer controls. A wait that
    /// expires with neither view present is an automation failure and
    /// propagates; nothing is swallowed here.
    pub async fn answer_questions(&self) -> StepResult<u32> {
        log::info!("Step 3: Answering questions");
        let driver = self.driver()?;
        let mut answered = 0u32;

        loop {
            if self.results_view_reached().await? {
                break;
            }

            let question_present = driver
                .wait_for_element(&question_heading(), self.config.wait_timeout_ms)
                .await?;
            if !question_present {
                // The last "next" click may have navigated to the results view.
                if self.results_view_reached().await? {
                    break;
                }
                return Err(StepError::automation(format!(
                    "Timed out after {}ms waiting for a question or the results view",
                    self.config.wait_timeout_ms
                )));
            }

            let options = driver.count(&answer_inputs()).await?;
            if options == 0 {
                log::info!("No answer controls present, quiz complete");
                break;
            }

            if answered >= MAX_QUESTIONS {
                return Err(StepError::automation(format!(
                    "Quiz did not reach the results view after {} questions",
                    MAX_QUESTIONS
                )));
            }

            answered += 1;
            let question = driver.element_text(&question_heading()).await?;
            log::info!("Question {}: {}", answered, question);

            driver.click(&answer_inputs()).await?;
            self.capture_step(&format!("question_{}_answered", answered))
                .await?;
            driver.click(&next_button()).await?;
            self.wait_for_view_advance(&question).await?;
        }

        log::info!("Answered {} questions", answered);
        Ok(answered)
    }

    /// Step 4: results view shows a score and the chart.
    pub async fn verify_results(&self) -> StepResult<String> {
        log::info!("Step 4: Verifying results page");
        let driver = self.driver()?;

        let present = driver
            .wait_for_element(&result_container(), self.config.wait_timeout_ms)
            .await?;
        if !present {
            return Err(StepError::assertion("Results container did not appear"));
        }

        let url = driver.current_url().await?;
        if !url.contains(RESULTS_PATH_MARKER) {
            return Err(StepError::assertion(format!(
                "Expected to be on results page, current URL: {}",
                url
            )));
        }

        let score = driver.element_text(&score_text()).await?;
        log::info!("Quiz score: {}", score);

        if !driver.is_visible(&result_chart()).await? {
            return Err(StepError::assertion("Results chart is not displayed"));
        }

        self.capture_step("final_results").await?;
        log::info!("Results page verification completed");
        Ok(score)
    }

    /// Run the four steps for one scenario, recording exactly one TestResult
    /// in the history whatever the outcome, then re-raising any failure to
    /// the caller.
    pub async fn run_complete_test(&mut self, category: &str, difficulty: &str) -> StepResult<()> {
        let started = Instant::now();
        self.emitter.emit(RunEvent::ScenarioStarted {
            category: category.to_string(),
            difficulty: difficulty.to_string(),
        });
        log::info!("Starting complete quiz test: {} / {}", category, difficulty);

        let mut result = TestResult::begin(category, difficulty);
        let outcome = self.run_steps(category, difficulty).await;

        match &outcome {
            Ok(score) => {
                result.pass(score.clone());
                log::info!("Test completed successfully, final score: {}", score);
            }
            Err(err) => {
                result.fail(err.to_string());
                log::error!("Test failed: {}", err);
                if let Err(shot_err) = self.capture_step("error_state").await {
                    log::warn!("Could not capture failure screenshot: {}", shot_err);
                }
            }
        }

        result.finish();
        self.emitter.emit(RunEvent::ScenarioFinished {
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            status: result.status,
            score: result.score.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
        });
        self.history.push(result);

        outcome.map(|_| ())
    }

    async fn run_steps(&self, category: &str, difficulty: &str) -> StepResult<String> {
        self.observe("verify_landing_page", self.verify_landing_page())
            .await?;
        self.observe("start_quiz", self.start_quiz(category, difficulty))
            .await?;
        self.observe("answer_questions", self.answer_questions())
            .await?;
        self.observe("verify_results", self.verify_results()).await
    }

    /// Emit step lifecycle events around a step future.
    async fn observe<T, F>(&self, name: &str, step: F) -> StepResult<T>
    where
        F: Future<Output = StepResult<T>>,
    {
        let started = Instant::now();
        self.emitter.emit(RunEvent::StepStarted {
            name: name.to_string(),
        });
        match step.await {
            Ok(value) => {
                self.emitter.emit(RunEvent::StepPassed {
                    name: name.to_string(),
                    duration_ms: started.elapsed().as_millis() as u64,
                });
                Ok(value)
            }
            Err(err) => {
                self.emitter.emit(RunEvent::StepFailed {
                    name: name.to_string(),
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Bounded wait for the view to move past the question just answered.
    ///
    /// The old question's heading is still in the DOM while the app
    /// re-renders, so polling for `h3` presence alone would re-read a stale
    /// question. Advanced means the heading text changed or the results view
    /// appeared.
    async fn wait_for_view_advance(&self, previous_question: &str) -> StepResult<()> {
        let driver = self.driver()?;
        let deadline = Duration::from_millis(self.config.wait_timeout_ms);
        let started = Instant::now();

        loop {
            if self.results_view_reached().await? {
                return Ok(());
            }
            let current = driver.element_text(&question_heading()).await?;
            if current != previous_question {
                return Ok(());
            }
            if started.elapsed() >= deadline {
                return Err(StepError::automation(format!(
                    "Quiz view did not advance within {}ms after answering: {}",
                    self.config.wait_timeout_ms, previous_question
                )));
            }
            tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
        }
    }

    async fn results_view_reached(&self) -> StepResult<bool> {
        let driver = self.driver()?;
        let url = driver.current_url().await?;
        if url.contains(RESULTS_PATH_MARKER) {
            return Ok(true);
        }
        Ok(driver.is_visible(&result_container()).await?)
    }

    /// Save a `{step}_{timestamp}.png` screenshot of the current view.
    async fn capture_step(&self, step: &str) -> StepResult<PathBuf> {
        let driver = self.driver()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .config
            .screenshots_dir()
            .join(format!("{}_{}.png", step, timestamp));

        driver.take_screenshot(&path).await?;
        log::info!("Screenshot saved: {}", path.display());
        self.emitter.emit(RunEvent::Log {
            message: format!("Screenshot: {}", path.display()),
        });
        Ok(path)
    }

    /// Write the JSON report for the history at call time.
    pub fn generate_test_report(&self) -> anyhow::Result<PathBuf> {
        let path = write_report(&self.history, &self.config.reports_dir())?;
        log::info!("Test report generated: {}", path.display());
        Ok(path)
    }

    /// Release the browser session. Safe to call more than once.
    pub async fn cleanup(&mut self) -> anyhow::Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.close().await?;
            log::info!("Browser session closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{QuizReport, TestStatus};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// One rendered view of the scripted quiz app.
    #[derive(Debug, Clone, Default)]
    struct MockPage {
        title: String,
        url: String,
        heading: Option<String>,
        question: Option<String>,
        answers: usize,
        score: Option<String>,
    }

    impl MockPage {
        fn landing() -> Self {
            Self {
                title: "Quiz Home - Dynamic Quiz App".to_string(),
                url: "http://localhost:9000/".to_string(),
                heading: Some("Dynamic Quiz App".to_string()),
                ..Default::default()
            }
        }

        fn question(n: u32, answers: usize) -> Self {
            Self {
                title: "Quiz".to_string(),
                url: "http://localhost:9000/quiz".to_string(),
                question: Some(format!("Question {}?", n)),
                answers,
                ..Default::default()
            }
        }

        fn results(score: &str) -> Self {
            Self {
                title: "Results".to_string(),
                url: format!("http://localhost:9000/result?score={}", score),
                score: Some(score.to_string()),
                ..Default::default()
            }
        }
    }

    #[derive(Default)]
    struct MockState {
        pages: Vec<MockPage>,
        index: Mutex<usize>,
        advance_delay: u32,
        pending_advance: Mutex<Option<u32>>,
        clicks: Mutex<Vec<String>>,
        selections: Mutex<Vec<(String, String)>>,
        screenshots: Mutex<Vec<PathBuf>>,
        closes: Mutex<u32>,
    }

    /// Scripted driver: a linear sequence of pages, advanced by "Start Quiz"
    /// and "#nextBtn" clicks; navigation to the base URL rewinds to page 0.
    ///
    /// With a nonzero `advance_delay` a click does not advance immediately;
    /// the next view appears only after that many further driver calls, the
    /// way a real app keeps showing the old DOM while it re-renders.
    #[derive(Clone)]
    struct MockDriver {
        state: Arc<MockState>,
    }

    impl MockDriver {
        fn new(pages: Vec<MockPage>) -> Self {
            Self::delayed(pages, 0)
        }

        fn delayed(pages: Vec<MockPage>, advance_delay: u32) -> Self {
            Self {
                state: Arc::new(MockState {
                    pages,
                    advance_delay,
                    ..Default::default()
                }),
            }
        }

        fn page(&self) -> MockPage {
            let index = *self.state.index.lock().unwrap();
            self.state.pages[index].clone()
        }

        fn advance(&self) {
            let mut index = self.state.index.lock().unwrap();
            if *index + 1 < self.state.pages.len() {
                *index += 1;
            }
        }

        fn advance_after_delay(&self) {
            if self.state.advance_delay == 0 {
                self.advance();
            } else {
                *self.state.pending_advance.lock().unwrap() = Some(self.state.advance_delay);
            }
        }

        /// Count down a pending deferred advance, one tick per driver call.
        fn tick(&self) {
            let mut pending = self.state.pending_advance.lock().unwrap();
            if let Some(remaining) = pending.take() {
                if remaining <= 1 {
                    drop(pending);
                    self.advance();
                } else {
                    *pending = Some(remaining - 1);
                }
            }
        }

        fn present(&self, selector: &Selector) -> bool {
            let page = self.page();
            match selector {
                Selector::Tag(tag) if tag == "h1" => page.heading.is_some(),
                Selector::Tag(tag) if tag == "h3" => page.question.is_some(),
                Selector::Id(id) if id == "question-box" => page.question.is_some(),
                Selector::Id(id) if id == "nextBtn" => page.question.is_some(),
                Selector::Id(id) if id == "category" || id == "difficulty" => {
                    page.heading.is_some()
                }
                Selector::Id(id) if id == "chart" => page.score.is_some(),
                Selector::Css(css) if css == ".result-container" => page.score.is_some(),
                Selector::Css(css) if css == ".score-box h2" => page.score.is_some(),
                Selector::Css(css) if css == "input[name=\"answer\"]" => page.answers > 0,
                Selector::Text(text) if text == "Start Quiz" => page.heading.is_some(),
                _ => false,
            }
        }
    }

    #[async_trait]
    impl BrowserDriver for MockDriver {
        fn session_name(&self) -> String {
            "mock".to_string()
        }

        async fn goto(&self, _url: &str) -> Result<()> {
            *self.state.index.lock().unwrap() = 0;
            Ok(())
        }

        async fn title(&self) -> Result<String> {
            self.tick();
            Ok(self.page().title)
        }

        async fn current_url(&self) -> Result<String> {
            self.tick();
            Ok(self.page().url)
        }

        async fn click(&self, selector: &Selector) -> Result<()> {
            self.tick();
            if !self.present(selector) {
                anyhow::bail!("Failed to click: {}", selector);
            }
            self.state
                .clicks
                .lock()
                .unwrap()
                .push(selector.to_string());
            match selector {
                Selector::Text(text) if text == "Start Quiz" => self.advance_after_delay(),
                Selector::Id(id) if id == "nextBtn" => self.advance_after_delay(),
                _ => {}
            }
            Ok(())
        }

        async fn select_value(&self, selector: &Selector, value: &str) -> Result<()> {
            self.tick();
            if !self.present(selector) {
                anyhow::bail!("Select not found: {}", selector);
            }
            self.state
                .selections
                .lock()
                .unwrap()
                .push((selector.to_string(), value.to_string()));
            Ok(())
        }

        async fn is_visible(&self, selector: &Selector) -> Result<bool> {
            self.tick();
            Ok(self.present(selector))
        }

        async fn wait_for_element(&self, selector: &Selector, _timeout_ms: u64) -> Result<bool> {
            self.tick();
            Ok(self.present(selector))
        }

        async fn element_text(&self, selector: &Selector) -> Result<String> {
            self.tick();
            let page = self.page();
            let text = match selector {
                Selector::Tag(tag) if tag == "h1" => page.heading,
                Selector::Tag(tag) if tag == "h3" => page.question,
                Selector::Css(css) if css == ".score-box h2" => page.score,
                _ => None,
            };
            Ok(text.unwrap_or_default())
        }

        async fn count(&self, selector: &Selector) -> Result<usize> {
            self.tick();
            match selector {
                Selector::Css(css) if css == "input[name=\"answer\"]" => Ok(self.page().answers),
                other => Ok(usize::from(self.present(other))),
            }
        }

        async fn take_screenshot(&self, path: &Path) -> Result<()> {
            self.state
                .screenshots
                .lock()
                .unwrap()
                .push(path.to_path_buf());
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            *self.state.closes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn test_config(output: &Path) -> RunnerConfig {
        RunnerConfig {
            base_url: "http://localhost:9000".to_string(),
            wait_timeout_ms: 100,
            poll_interval_ms: 10,
            startup_timeout_ms: 100,
            output_dir: output.to_path_buf(),
        }
    }

    fn runner_with(pages: Vec<MockPage>, output: &Path) -> (QuizRunner, MockDriver) {
        let driver = MockDriver::new(pages);
        let runner = QuizRunner::new(
            Box::new(driver.clone()),
            test_config(output),
            EventEmitter::default(),
        );
        (runner, driver)
    }

    fn happy_flow() -> Vec<MockPage> {
        vec![
            MockPage::landing(),
            MockPage::question(1, 3),
            MockPage::question(2, 3),
            MockPage::results("2/3"),
        ]
    }

    #[tokio::test]
    async fn complete_test_records_passed_result_with_score() {
        let dir = tempfile::tempdir().unwrap();
        let (mut runner, driver) = runner_with(happy_flow(), dir.path());

        runner.run_complete_test("math", "easy").await.unwrap();

        assert_eq!(runner.history().len(), 1);
        let result = &runner.history()[0];
        assert_eq!(result.status, TestStatus::Passed);
        assert_eq!(result.score, "2/3");
        assert_eq!(result.category, "math");
        assert!(result.error.is_none());
        assert!(result.end_time.is_some());

        let selections = driver.state.selections.lock().unwrap();
        assert_eq!(
            *selections,
            vec![
                ("#category".to_string(), "math".to_string()),
                ("#difficulty".to_string(), "easy".to_string()),
            ]
        );

        // landing, setup, started, one per question, final results
        let screenshots = driver.state.screenshots.lock().unwrap();
        assert_eq!(screenshots.len(), 6);
    }

    #[tokio::test]
    async fn wrong_title_fails_assertion_before_starting_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let mut pages = happy_flow();
        pages[0].title = "Welcome".to_string();
        let (mut runner, driver) = runner_with(pages, dir.path());

        let err = runner.run_complete_test("math", "easy").await.unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("Quiz Home"));
        assert!(err.to_string().contains("Welcome"));

        // Exactly one result recorded, and the quiz was never started.
        assert_eq!(runner.history().len(), 1);
        assert_eq!(runner.history()[0].status, TestStatus::Failed);
        assert!(runner.history()[0].error.is_some());
        let clicks = driver.state.clicks.lock().unwrap();
        assert!(clicks.is_empty());
    }

    #[tokio::test]
    async fn missing_question_box_is_an_assertion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![MockPage::landing(), MockPage::default()];
        let (runner, _driver) = runner_with(pages, dir.path());

        runner.verify_landing_page().await.unwrap();
        let err = runner.start_quiz("math", "easy").await.unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("First question is not displayed"));
    }

    #[tokio::test]
    async fn answer_questions_completes_when_no_answer_controls() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![MockPage::question(1, 0)];
        let (runner, _driver) = runner_with(pages, dir.path());

        let answered = runner.answer_questions().await.unwrap();
        assert_eq!(answered, 0);
    }

    #[tokio::test]
    async fn answer_questions_propagates_automation_failure() {
        let dir = tempfile::tempdir().unwrap();
        // Neither a question nor the results view ever renders.
        let pages = vec![MockPage::default()];
        let (runner, _driver) = runner_with(pages, dir.path());

        let err = runner.answer_questions().await.unwrap_err();
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("results view"));
    }

    #[tokio::test]
    async fn answer_questions_stops_at_results_view() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![
            MockPage::question(1, 2),
            MockPage::results("1/1"),
        ];
        let (runner, _driver) = runner_with(pages, dir.path());

        let answered = runner.answer_questions().await.unwrap();
        assert_eq!(answered, 1);
    }

    #[tokio::test]
    async fn waits_for_the_view_to_advance_after_next_click() {
        let dir = tempfile::tempdir().unwrap();
        // The question view keeps rendering for a few driver calls after the
        // next click before the results view replaces it.
        let pages = vec![MockPage::question(1, 3), MockPage::results("1/1")];
        let driver = MockDriver::delayed(pages, 4);
        let runner = QuizRunner::new(
            Box::new(driver.clone()),
            test_config(dir.path()),
            EventEmitter::default(),
        );

        let answered = runner.answer_questions().await.unwrap();
        assert_eq!(answered, 1);

        // The stale question must not be answered a second time.
        let clicks = driver.state.clicks.lock().unwrap();
        let answer_clicks = clicks
            .iter()
            .filter(|c| c.as_str() == "input[name=\"answer\"]")
            .count();
        assert_eq!(answer_clicks, 1);
    }

    #[tokio::test]
    async fn stalled_view_after_next_click_is_an_automation_failure() {
        let dir = tempfile::tempdir().unwrap();
        // The click is accepted but the page never re-renders.
        let pages = vec![MockPage::question(1, 3)];
        let driver = MockDriver::delayed(pages, u32::MAX);
        let runner = QuizRunner::new(
            Box::new(driver.clone()),
            test_config(dir.path()),
            EventEmitter::default(),
        );

        let err = runner.answer_questions().await.unwrap_err();
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("did not advance"));
    }

    #[tokio::test]
    async fn verify_results_rejects_non_result_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = MockPage::results("3/3");
        page.url = "http://localhost:9000/quiz".to_string();
        let (runner, _driver) = runner_with(vec![page], dir.path());

        let err = runner.verify_results().await.unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("http://localhost:9000/quiz"));
    }

    #[tokio::test]
    async fn every_run_appends_exactly_one_result() {
        let dir = tempfile::tempdir().unwrap();
        let (mut runner, _driver) = runner_with(happy_flow(), dir.path());

        runner.run_complete_test("math", "easy").await.unwrap();
        runner.run_complete_test("gk", "medium").await.unwrap();
        assert_eq!(runner.history().len(), 2);

        let report_path = runner.generate_test_report().unwrap();
        let report: QuizReport =
            serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report.report_info.total_tests, 2);
        assert_eq!(
            report.report_info.total_tests,
            report.report_info.passed_tests + report.report_info.failed_tests
        );
    }

    #[tokio::test]
    async fn cleanup_is_idempotent_and_releases_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let (mut runner, driver) = runner_with(happy_flow(), dir.path());

        runner.cleanup().await.unwrap();
        runner.cleanup().await.unwrap();
        assert_eq!(*driver.state.closes.lock().unwrap(), 1);

        // Steps after release fail as automation errors, not panics.
        let err = runner.verify_landing_page().await.unwrap_err();
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("already released"));
    }
}
