//! Index specifications and expected build outcomes.

use crate::document::DEFAULT_FIELD;
use crate::generator::ValueGenerator;
use serde::{Deserialize, Serialize};

/// Sort direction of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexDirection {
    #[default]
    Ascending,
    Descending,
}

impl IndexDirection {
    /// Key-pattern value (`1` or `-1`).
    pub fn as_i32(self) -> i32 {
        match self {
            IndexDirection::Ascending => 1,
            IndexDirection::Descending => -1,
        }
    }
}

/// A single-field index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    #[serde(default)]
    pub direction: IndexDirection,
    #[serde(default = "default_unique")]
    pub unique: bool,
}

fn default_unique() -> bool {
    true
}

impl IndexSpec {
    /// `{ a: 1 }, { unique: true }`
    pub fn unique_ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: IndexDirection::Ascending,
            unique: true,
        }
    }

    /// Conventional index name, e.g. `a_1`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.field, self.direction.as_i32())
    }
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self::unique_ascending(DEFAULT_FIELD)
    }
}

/// The index-build outcome a scenario expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
    Success,
    DuplicateKeyFailure,
}

impl ExpectedOutcome {
    /// Outcome implied by loading `target_count` documents `passes` times
    /// through one generator whose index keeps running across passes.
    pub fn for_generator(generator: &ValueGenerator, target_count: u64, passes: u32) -> Self {
        let total = target_count.saturating_mul(u64::from(passes));
        if generator.is_unique_over(0, total) {
            ExpectedOutcome::Success
        } else {
            ExpectedOutcome::DuplicateKeyFailure
        }
    }
}

impl std::fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedOutcome::Success => write!(f, "success"),
            ExpectedOutcome::DuplicateKeyFailure => write!(f, "duplicate-key failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec() {
        let spec = IndexSpec::default();
        assert_eq!(spec.field, "a");
        assert!(spec.unique);
        assert_eq!(spec.name(), "a_1");
    }

    #[test]
    fn test_expected_for_generator() {
        let constant = ValueGenerator::constant(1);
        assert_eq!(
            ExpectedOutcome::for_generator(&constant, 10, 1),
            ExpectedOutcome::DuplicateKeyFailure
        );
        assert_eq!(
            ExpectedOutcome::for_generator(&constant, 1, 1),
            ExpectedOutcome::Success
        );
        assert_eq!(
            ExpectedOutcome::for_generator(&constant, 1, 2),
            ExpectedOutcome::DuplicateKeyFailure
        );

        let sequential = ValueGenerator::sequential(0);
        assert_eq!(
            ExpectedOutcome::for_generator(&sequential, 2_000_000, 1),
            ExpectedOutcome::Success
        );
        // The index keeps running across passes, so values stay distinct.
        assert_eq!(
            ExpectedOutcome::for_generator(&sequential, 10, 2),
            ExpectedOutcome::Success
        );
    }
}
