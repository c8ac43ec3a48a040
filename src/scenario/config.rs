//! Scenario descriptions and YAML scenario files.
//!
//! A scenario file looks like:
//!
//! ```yaml
//! scenarios:
//!   - name: stress_unique_index
//!     collection: stress_index
//!     target_count: 10
//!     generator:
//!       type: constant
//!       value: 1
//!     expected: duplicate_key_failure
//! ```

use index_stress_core::{ExpectedOutcome, IndexSpec, ValueGenerator, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Error type for scenario configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading scenario file
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Scenario fails validation
    #[error("Invalid scenario '{scenario}': {reason}")]
    Invalid { scenario: String, reason: String },

    /// Requested scenario is not defined
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),
}

fn default_chunk_size() -> i64 {
    DEFAULT_CHUNK_SIZE
}

fn default_load_passes() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// One load-then-index stress scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub collection: String,
    pub target_count: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i64,
    pub generator: ValueGenerator,
    /// Number of times the loader runs before validation, without a drop in between.
    #[serde(default = "default_load_passes")]
    pub load_passes: u32,
    #[serde(default)]
    pub index: IndexSpec,
    /// Overrides the outcome derived from the generator.
    #[serde(default)]
    pub expected: Option<ExpectedOutcome>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Storage engines on which the scenario does not run.
    #[serde(default)]
    pub skip_storage_engines: Vec<String>,
    /// Check the collection count after loading and after the index build.
    #[serde(default = "default_true")]
    pub verify_count: bool,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        collection: impl Into<String>,
        target_count: u64,
        generator: ValueGenerator,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            target_count,
            chunk_size: DEFAULT_CHUNK_SIZE,
            generator,
            load_passes: 1,
            index: IndexSpec::default(),
            expected: None,
            tags: Vec::new(),
            skip_storage_engines: Vec::new(),
            verify_count: true,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_load_passes(mut self, passes: u32) -> Self {
        self.load_passes = passes;
        self
    }

    pub fn with_expected(mut self, expected: ExpectedOutcome) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn skip_on_storage_engine(mut self, engine: impl Into<String>) -> Self {
        self.skip_storage_engines.push(engine.into());
        self
    }

    /// Documents in the collection once every load pass has finished.
    pub fn expected_document_count(&self) -> u64 {
        self.target_count.saturating_mul(u64::from(self.load_passes))
    }

    /// The explicit expectation, or the one implied by the generator.
    pub fn expected_outcome(&self) -> ExpectedOutcome {
        self.expected.unwrap_or_else(|| {
            if !self.index.unique {
                return ExpectedOutcome::Success;
            }
            if self.index.field != index_stress_core::DEFAULT_FIELD {
                // Absent fields index as null.
                return if self.expected_document_count() < 2 {
                    ExpectedOutcome::Success
                } else {
                    ExpectedOutcome::DuplicateKeyFailure
                };
            }
            ExpectedOutcome::for_generator(&self.generator, self.target_count, self.load_passes)
        })
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    /// Check the parameters before anything touches the database.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            scenario: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if self.collection.trim().is_empty() {
            return Err(invalid("collection must not be empty".to_string()));
        }
        if self.chunk_size <= 0 {
            return Err(invalid(format!(
                "chunk_size must be at least 1, got {}",
                self.chunk_size
            )));
        }
        if self.load_passes == 0 {
            return Err(invalid("load_passes must be at least 1".to_string()));
        }
        if !self.index.unique && self.expected == Some(ExpectedOutcome::DuplicateKeyFailure) {
            return Err(invalid(
                "a non-unique index cannot fail with a duplicate key".to_string(),
            ));
        }
        Ok(())
    }
}

/// A set of scenarios loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioFile {
    /// Load and validate scenarios from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate scenarios from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: ScenarioFile = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::Invalid {
                    scenario: scenario.name.clone(),
                    reason: "duplicate scenario name".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    /// Keep only the named scenarios, in the order given.
    pub fn select(&self, names: &[String]) -> Result<Vec<Scenario>, ConfigError> {
        if names.is_empty() {
            return Ok(self.scenarios.clone());
        }
        names
            .iter()
            .map(|name| {
                self.scenarios
                    .iter()
                    .find(|s| &s.name == name)
                    .cloned()
                    .ok_or_else(|| ConfigError::ScenarioNotFound(name.clone()))
            })
            .collect()
    }
}
