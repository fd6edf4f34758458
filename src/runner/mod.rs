pub mod error;
pub mod events;
pub mod quiz;

use anyhow::{Context, Result};
use colored::Colorize;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::driver::traits::BrowserDriver;
use crate::driver::web::{WebDriver, WebDriverConfig};
use crate::report::types::TestStatus;
use crate::runner::events::{ConsoleEventListener, EventEmitter, RunEvent};
use crate::runner::quiz::QuizRunner;
use crate::utils::config::RunnerConfig;

/// One (category, difficulty) configuration for a single test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub category: String,
    pub difficulty: String,
}

impl Scenario {
    pub fn new(category: &str, difficulty: &str) -> Self {
        Self {
            category: category.to_string(),
            difficulty: difficulty.to_string(),
        }
    }

    /// The fixed default batch
    pub fn default_batch() -> Vec<Scenario> {
        vec![
            Scenario::new("math", "easy"),
            Scenario::new("gk", "medium"),
            Scenario::new("math", "hard"),
        ]
    }
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    /// Parse `category:difficulty`, e.g. `math:easy`.
    fn from_str(s: &str) -> Result<Self> {
        let (category, difficulty) = s
            .split_once(':')
            .with_context(|| format!("Expected 'category:difficulty', got: {}", s))?;
        if category.is_empty() || difficulty.is_empty() {
            anyhow::bail!("Expected 'category:difficulty', got: {}", s);
        }
        Ok(Scenario::new(category.trim(), difficulty.trim()))
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category, self.difficulty)
    }
}

/// Run a scenario batch against the target app.
///
/// Acquires one browser session for the whole batch, continues past
/// per-scenario failures, and always generates a report and releases the
/// session before returning.
pub async fn run_scenarios(
    scenarios: &[Scenario],
    config: RunnerConfig,
    web_config: WebDriverConfig,
) -> Result<()> {
    let (emitter, receiver) = EventEmitter::new();
    let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

    // Ctrl+C finishes the current scenario, then reports and cleans up.
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_handler = stop_flag.clone();
    ctrlc::set_handler(move || {
        println!("\n{} Stopping after the current scenario...", "⏹".yellow());
        stop_handler.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    wait_for_app_ready(&config).await?;

    let driver = WebDriver::new(web_config).await?;
    let session_id = Uuid::new_v4().to_string();
    emitter.emit(RunEvent::SessionStarted {
        session_id,
        browser: driver.session_name(),
    });

    let mut runner = QuizRunner::new(Box::new(driver), config, emitter);

    for scenario in scenarios {
        if stop_flag.load(Ordering::SeqCst) {
            log::warn!("Stop requested, skipping remaining scenarios");
            break;
        }

        if let Err(err) = runner
            .run_complete_test(&scenario.category, &scenario.difficulty)
            .await
        {
            // Failure is already recorded in the history; move on.
            log::error!("Scenario {} failed: {}", scenario, err);
        }
    }

    let passed = runner
        .history()
        .iter()
        .filter(|r| r.status == TestStatus::Passed)
        .count();
    let total = runner.history().len();

    // Report and release always run, in that order, whatever happened above.
    let report_result = runner.generate_test_report();
    if let Err(err) = runner.cleanup().await {
        log::warn!("Failed to release browser session: {}", err);
    }

    runner.emitter().emit(RunEvent::SessionFinished {
        total,
        passed,
        failed: total - passed,
    });
    // Dropping the runner closes the event channel; the listener exits once
    // it has printed everything still buffered.
    drop(runner);
    listener.await.ok();

    let report_path = report_result?;
    println!(
        "\n{} Test report generated: {}",
        "📊".blue(),
        report_path.display().to_string().cyan()
    );

    if passed < total {
        anyhow::bail!("{} of {} scenarios failed", total - passed, total);
    }
    Ok(())
}

/// Poll the target app until it responds, so a slow start does not surface
/// as a landing-page failure.
async fn wait_for_app_ready(config: &RunnerConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let deadline = Duration::from_millis(config.startup_timeout_ms);
    let start = Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < deadline {
        attempts += 1;
        match client.get(&config.base_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                log::info!("Target app is up at {}", config.base_url);
                return Ok(());
            }
            Ok(resp) => {
                log::warn!("Readiness probe returned {}", resp.status());
            }
            Err(err) => {
                if attempts == 1 {
                    log::info!("Waiting for target app at {}...", config.base_url);
                }
                // Connection refused is expected while the app is starting
                if !err.is_connect() {
                    log::warn!("Readiness probe error: {}", err);
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
    }

    anyhow::bail!(
        "Target app at {} did not become ready after {} attempts",
        config.base_url,
        attempts
    )
}
