//! Per-scenario reports and run summaries.

use chrono::{DateTime, Utc};
use index_stress_core::ExpectedOutcome;
use index_stress_loader::LoadResult;
use index_stress_validator::IndexOutcome;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Skipped { reason: String },
    Failed { error: String },
}

/// What happened to one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub collection: String,
    pub started_at: DateTime<Utc>,
    pub status: ScenarioStatus,
    pub expected: ExpectedOutcome,
    pub load: Option<LoadResult>,
    pub count_after_load: Option<u64>,
    pub outcome: Option<IndexOutcome>,
    pub count_after_index: Option<u64>,
    pub validation_duration: Duration,
}

impl ScenarioReport {
    pub fn new(name: &str, collection: &str, expected: ExpectedOutcome) -> Self {
        Self {
            name: name.to_string(),
            collection: collection.to_string(),
            started_at: Utc::now(),
            status: ScenarioStatus::Passed,
            expected,
            load: None,
            count_after_load: None,
            outcome: None,
            count_after_index: None,
            validation_duration: Duration::ZERO,
        }
    }

    pub fn documents_loaded(&self) -> u64 {
        self.load.as_ref().map_or(0, |l| l.documents_inserted)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ScenarioStatus::Failed { .. })
    }
}

/// Reports for every scenario in a run, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, ScenarioStatus::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ScenarioStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ScenarioStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ScenarioStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary, one line per scenario.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for report in &self.reports {
            let status = match &report.status {
                ScenarioStatus::Passed => "PASS".to_string(),
                ScenarioStatus::Skipped { reason } => format!("SKIP ({reason})"),
                ScenarioStatus::Failed { error } => format!("FAIL ({error})"),
            };
            let load_time = report
                .load
                .as_ref()
                .map(|l| l.total_duration)
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{:<40} {:>10} docs  load {:>10.2?}  index {:>10.2?}  {}",
                report.name,
                report.documents_loaded(),
                load_time,
                report.validation_duration,
                status
            );
        }
        let _ = writeln!(
            out,
            "{} passed, {} skipped, {} failed",
            self.passed(),
            self.skipped(),
            self.failed()
        );
        out
    }
}
