use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration as StdDuration;
use tokio::sync::broadcast;

use crate::report::types::TestStatus;

/// Run progress events for coordinated console output
#[derive(Debug, Clone)]
pub enum RunEvent {
    SessionStarted {
        session_id: String,
        browser: String,
    },
    SessionFinished {
        total: usize,
        passed: usize,
        failed: usize,
    },

    ScenarioStarted {
        category: String,
        difficulty: String,
    },
    ScenarioFinished {
        category: String,
        difficulty: String,
        status: TestStatus,
        score: String,
        duration_ms: u64,
    },

    StepStarted {
        name: String,
    },
    StepPassed {
        name: String,
        duration_ms: u64,
    },
    StepFailed {
        name: String,
        error: String,
    },

    Log {
        message: String,
    },
}

/// Event emitter for broadcasting run events
pub struct EventEmitter {
    sender: broadcast::Sender<RunEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<RunEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: RunEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

/// Console listener printing real-time run progress
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<RunEvent>) {
        let multi = if std::io::stdout().is_terminal() {
            MultiProgress::new()
        } else {
            // Piped output: hide spinners to avoid escape codes
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let mut spinner: Option<ProgressBar> = None;
        let mut step_text = String::new();

        while let Ok(event) = receiver.recv().await {
            match event {
                RunEvent::SessionStarted {
                    session_id,
                    browser,
                } => {
                    multi
                        .println(format!(
                            "\n{} Test session started: {} ({})",
                            "▶".green().bold(),
                            session_id.cyan(),
                            browser
                        ))
                        .ok();
                }

                RunEvent::SessionFinished {
                    total,
                    passed,
                    failed,
                } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish();
                    }
                    println!("\n{} Test session finished", "■".blue().bold());
                    println!("  Total scenarios: {}", total);
                    println!(
                        "  {} passed, {} failed",
                        passed.to_string().green(),
                        failed.to_string().red()
                    );
                }

                RunEvent::ScenarioStarted {
                    category,
                    difficulty,
                } => {
                    println!(
                        "\n  {} Scenario: {} / {}",
                        "→".blue(),
                        category.to_uppercase().white().bold(),
                        difficulty.to_uppercase().white().bold()
                    );
                }

                RunEvent::ScenarioFinished {
                    category,
                    difficulty,
                    status,
                    score,
                    duration_ms,
                } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish();
                    }
                    let status_str = match status {
                        TestStatus::Passed => "PASSED".green().bold(),
                        TestStatus::Failed => "FAILED".red().bold(),
                    };
                    println!(
                        "  {} Scenario {} / {} [{}] score: {} ({}ms)",
                        "←".blue(),
                        category,
                        difficulty,
                        status_str,
                        score,
                        duration_ms
                    );
                }

                RunEvent::StepStarted { name } => {
                    let pb = multi.add(ProgressBar::new_spinner());
                    let style = ProgressStyle::default_spinner()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .template("    {spinner} {msg}")
                        .unwrap();
                    pb.set_style(style);

                    let body = format!("{}... ", name.dimmed());
                    pb.set_message(body.clone());
                    pb.enable_steady_tick(StdDuration::from_millis(100));

                    spinner = Some(pb);
                    step_text = body;
                }

                RunEvent::StepPassed { duration_ms, .. } => {
                    let done_msg =
                        format!("    {} {}({}ms)", "✓".green(), step_text, duration_ms);
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                        tokio::time::sleep(StdDuration::from_millis(50)).await;
                    }
                    println!("{}", done_msg);
                }

                RunEvent::StepFailed { error, .. } => {
                    let done_msg = format!("    {} {}", "✗".red(), step_text);
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                        tokio::time::sleep(StdDuration::from_millis(50)).await;
                    }
                    println!("{}", done_msg);
                    println!("      {}", error.red());
                }

                RunEvent::Log { message } => {
                    multi.println(format!("      {}", message)).ok();
                }
            }
        }
    }
}
