use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use std::path::PathBuf;

use quiz_tester::driver::web::{BrowserType, WebDriverConfig};
use quiz_tester::runner::Scenario;
use quiz_tester::utils::config::RunnerConfig;
use quiz_tester::utils::logging::FileConsoleLogger;

#[derive(Parser)]
#[command(name = "quiz-tester")]
#[command(version = "0.1.0")]
#[command(about = "Browser automation test runner for the Dynamic Quiz App", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario batch against the quiz app
    Run {
        /// Base URL of the quiz application
        #[arg(short, long, default_value = "http://localhost:9000")]
        base_url: String,

        /// Scenario as category:difficulty. Can be given multiple times;
        /// defaults to the fixed batch math:easy, gk:medium, math:hard.
        #[arg(short, long)]
        scenario: Vec<Scenario>,

        /// Output directory for screenshots, logs and reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Browser to drive (chromium, firefox, webkit)
        #[arg(long, default_value = "chromium")]
        browser: BrowserType,

        /// Run the browser headless (true/false); defaults to the
        /// QUIZ_HEADLESS environment variable, or true
        #[arg(long, action = clap::ArgAction::Set)]
        headless: Option<bool>,

        /// Element wait timeout in milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,
    },

    /// Summarize a previously generated report file
    Report {
        /// Path to a test_report_*.json file
        results: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            scenario,
            output,
            browser,
            headless,
            timeout_ms,
        } => {
            let scenarios = if scenario.is_empty() {
                Scenario::default_batch()
            } else {
                scenario
            };

            let config = RunnerConfig {
                base_url,
                wait_timeout_ms: timeout_ms,
                ..RunnerConfig::default().with_output_dir(&output)
            };

            let (logger, log_path) =
                FileConsoleLogger::create(&config.logs_dir(), LevelFilter::Info)?;
            logger.install()?;

            println!(
                "{} Running {} scenario(s) against {}",
                "▶".green().bold(),
                scenarios.len(),
                config.base_url.cyan()
            );
            println!("  Output: {}", output.display().to_string().cyan());
            println!("  Log: {}", log_path.display().to_string().cyan());

            let mut web_config = WebDriverConfig {
                browser_type: browser,
                ..WebDriverConfig::default()
            };
            if let Some(headless) = headless {
                web_config.headless = headless;
            }

            quiz_tester::run_scenarios(&scenarios, config, web_config).await?;
        }

        Commands::Report { results } => {
            quiz_tester::summarize_report(&results)?;
        }
    }

    Ok(())
}
