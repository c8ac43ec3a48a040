//! CLI argument definitions shared by every backend.

use crate::scenario::RunOptions;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Output format for the run summary.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments common to `run mongodb` and `run memory`.
#[derive(Args, Clone, Debug)]
pub struct CommonRunArgs {
    /// YAML scenario file (default: built-in scenarios)
    #[arg(long, short = 's')]
    pub scenarios: Option<PathBuf>,

    /// Run only these scenarios (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip scenarios carrying any of these tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude_tags: Vec<String>,

    /// Multiply every scenario's document count (e.g. 0.01 for a quick run)
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Override every scenario's bulk-insert chunk size
    #[arg(long, allow_negative_numbers = true)]
    pub chunk_size: Option<i64>,

    /// Dry-run mode: validate scenarios without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl CommonRunArgs {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            exclude_tags: self.exclude_tags.clone(),
            scale: self.scale,
            chunk_size: self.chunk_size,
            dry_run: self.dry_run,
        }
    }
}
