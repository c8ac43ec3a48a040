//! Scenario descriptions, the built-in catalog and the sequential runner.

pub mod catalog;
pub mod config;
pub mod report;
pub mod runner;

pub use catalog::builtin_scenarios;
pub use config::{ConfigError, Scenario, ScenarioFile};
pub use report::{RunSummary, ScenarioReport, ScenarioStatus};
pub use runner::{RunOptions, ScenarioError, ScenarioRunner};
