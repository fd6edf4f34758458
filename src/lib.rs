pub mod driver;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use report::summarize_report;
pub use runner::{run_scenarios, Scenario};
