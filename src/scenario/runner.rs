//! Sequential scenario execution: drop, load, count, index, count.

use super::config::{ConfigError, Scenario};
use super::report::{RunSummary, ScenarioReport, ScenarioStatus};
use index_stress_core::{ClientError, DatabaseClient};
use index_stress_loader::{LoadResult, Loader, LoaderError};
use index_stress_validator::{Validator, ValidatorError};
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that end a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A drop, count or server-status call failed.
    #[error("{operation} failed: {source}")]
    Client {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error(transparent)]
    Validation(#[from] ValidatorError),

    #[error(
        "Assertion failed on '{collection}' {stage}: expected {expected} documents, found {actual}"
    )]
    CountMismatch {
        collection: String,
        stage: &'static str,
        expected: u64,
        actual: u64,
    },
}

impl ScenarioError {
    fn client(operation: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| ScenarioError::Client { operation, source }
    }
}

/// Run-wide adjustments applied on top of each scenario.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scenarios carrying any of these tags are skipped.
    pub exclude_tags: Vec<String>,
    /// Multiplier for every scenario's target count.
    pub scale: f64,
    /// Replaces every scenario's chunk size.
    pub chunk_size: Option<i64>,
    /// Validate and report without touching the database.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            exclude_tags: Vec::new(),
            scale: 1.0,
            chunk_size: None,
            dry_run: false,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid {
                scenario: "*".to_string(),
                reason: format!("scale must be a positive number, got {}", self.scale),
            });
        }
        Ok(())
    }

    /// The scenario as it will actually run.
    pub fn apply(&self, scenario: &Scenario) -> Scenario {
        let mut scenario = scenario.clone();
        if (self.scale - 1.0).abs() > f64::EPSILON && scenario.target_count > 0 {
            // Keep at least two documents so duplicate scenarios can still collide.
            let scaled = (scenario.target_count as f64 * self.scale).round() as u64;
            scenario.target_count = scaled.max(scenario.target_count.min(2));
        }
        if let Some(chunk_size) = self.chunk_size {
            scenario.chunk_size = chunk_size;
        }
        scenario
    }
}

/// Runs scenarios one after another against a single client.
pub struct ScenarioRunner<'a, C: DatabaseClient + ?Sized> {
    client: &'a C,
    options: RunOptions,
}

impl<'a, C: DatabaseClient + ?Sized> ScenarioRunner<'a, C> {
    pub fn new(client: &'a C, options: RunOptions) -> Self {
        Self { client, options }
    }

    /// Run every scenario in order. A failing scenario does not stop the run.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunSummary {
        let mut summary = RunSummary::default();
        for scenario in scenarios {
            summary.reports.push(self.run(scenario).await);
        }
        info!(
            "Run complete: {} passed, {} skipped, {} failed",
            summary.passed(),
            summary.skipped(),
            summary.failed()
        );
        summary
    }

    /// Run one scenario and record the result, whatever it is.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let scenario = self.options.apply(scenario);
        let mut report = ScenarioReport::new(
            &scenario.name,
            &scenario.collection,
            scenario.expected_outcome(),
        );

        match self.execute(&scenario, &mut report).await {
            Ok(Some(reason)) => {
                info!("Skipping scenario '{}': {}", scenario.name, reason);
                report.status = ScenarioStatus::Skipped { reason };
            }
            Ok(None) => {
                info!("Scenario '{}' passed", scenario.name);
            }
            Err(e) => {
                error!("Scenario '{}' failed: {}", scenario.name, e);
                if let ScenarioError::Load(ref load_err) = e {
                    report.load = load_err.partial().cloned();
                }
                report.status = ScenarioStatus::Failed {
                    error: e.to_string(),
                };
            }
        }
        report
    }

    /// Returns `Some(reason)` when the scenario was skipped.
    async fn execute(
        &self,
        scenario: &Scenario,
        report: &mut ScenarioReport,
    ) -> Result<Option<String>, ScenarioError> {
        scenario.validate()?;

        if scenario.has_any_tag(&self.options.exclude_tags) {
            return Ok(Some(format!("excluded by tags {:?}", scenario.tags)));
        }

        let expected = scenario.expected_outcome();
        if self.options.dry_run {
            info!(
                "[DRY-RUN] Would load {} x {} documents into '{}' (chunk size {}, generator {}) and expect {}",
                scenario.load_passes,
                scenario.target_count,
                scenario.collection,
                scenario.chunk_size,
                scenario.generator,
                expected
            );
            return Ok(Some("dry run".to_string()));
        }

        if !scenario.skip_storage_engines.is_empty() {
            let engine = self
                .client
                .storage_engine()
                .await
                .map_err(ScenarioError::client("serverStatus"))?;
            if let Some(engine) = engine.filter(|e| scenario.skip_storage_engines.contains(e)) {
                return Ok(Some(format!("not supported on storage engine {engine}")));
            }
        }

        info!(
            "Running scenario '{}' on '{}': {} documents, {}, expecting {}",
            scenario.name, scenario.collection, scenario.target_count, scenario.generator, expected
        );

        self.client
            .drop_collection(&scenario.collection)
            .await
            .map_err(ScenarioError::client("drop"))?;

        let mut loader =
            Loader::new(self.client, scenario.collection.as_str()).with_chunk_size(scenario.chunk_size);
        let mut load = LoadResult::default();
        for pass in 1..=scenario.load_passes {
            if scenario.load_passes > 1 {
                info!("Load pass {}/{}", pass, scenario.load_passes);
            }
            match loader.load(scenario.target_count, scenario.generator.as_fn()).await {
                Ok(result) => load.merge(result),
                Err(LoaderError::Insert {
                    collection,
                    partial,
                    source,
                }) => {
                    load.merge(partial);
                    return Err(LoaderError::Insert {
                        collection,
                        partial: load,
                        source,
                    }
                    .into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        report.load = Some(load);

        let expected_count = scenario.expected_document_count();
        if scenario.verify_count {
            let count = self.checked_count(scenario, "after load", expected_count).await?;
            report.count_after_load = Some(count);
        }

        let validator = Validator::new(self.client, scenario.collection.as_str());
        let start = std::time::Instant::now();
        let result = validator
            .validate_unique_index(&scenario.index, expected)
            .await;
        report.validation_duration = start.elapsed();
        match result {
            Ok(outcome) => report.outcome = Some(outcome),
            Err(e) => {
                report.outcome = Some(e.actual().clone());
                return Err(e.into());
            }
        }

        // A failed index build must leave the loaded data untouched.
        if scenario.verify_count {
            let count = self
                .checked_count(scenario, "after index build", expected_count)
                .await?;
            report.count_after_index = Some(count);
        }

        Ok(None)
    }

    async fn checked_count(
        &self,
        scenario: &Scenario,
        stage: &'static str,
        expected: u64,
    ) -> Result<u64, ScenarioError> {
        let actual = self
            .client
            .count(&scenario.collection)
            .await
            .map_err(ScenarioError::client("count"))?;
        if actual != expected {
            warn!(
                "Count mismatch on '{}' {}: expected {}, found {}",
                scenario.collection, stage, expected, actual
            );
            return Err(ScenarioError::CountMismatch {
                collection: scenario.collection.clone(),
                stage,
                expected,
                actual,
            });
        }
        Ok(actual)
    }
}
