//! Log backend writing to both the console and a per-run log file.
//!
//! One timestamped file is created under the logs directory per process
//! execution; the `log` macros throughout the runner feed both sinks.

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct FileConsoleLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileConsoleLogger {
    /// Create a logger backed by `quiz_test_{timestamp}.log` in `log_dir`.
    pub fn create(log_dir: &Path, level: LevelFilter) -> Result<(Self, PathBuf)> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("quiz_test_{}.log", timestamp));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok((
            Self {
                file: Mutex::new(file),
                level,
            },
            path,
        ))
    }

    /// Install as the global `log` backend. Call once at startup.
    pub fn install(self) -> Result<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).context("Logger already installed")?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_line(record: &Record) -> String {
        format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        )
    }
}

impl log::Log for FileConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_line(record);

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }

        match record.level() {
            Level::Error => eprintln!("{}", line.red()),
            Level::Warn => eprintln!("{}", line.yellow()),
            _ => eprintln!("{}", line.dimmed()),
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
