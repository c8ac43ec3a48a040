//! Built-in unique-index stress scenarios.

use super::config::{Scenario, ScenarioFile};
use index_stress_core::{ExpectedOutcome, ValueGenerator};

pub const ASSUMES_UNSHARDED_COLLECTION: &str = "assumes_unsharded_collection";
pub const REQUIRES_NON_RETRYABLE_WRITES: &str = "requires_non_retryable_writes";

/// Storage engine on which the 500k-duplicate scenario is skipped.
pub const EPHEMERAL_FOR_TEST: &str = "ephemeralForTest";

/// The default scenario set.
pub fn builtin_scenarios() -> ScenarioFile {
    ScenarioFile {
        scenarios: vec![
            // Small duplicate set, then a count check after the failed build.
            Scenario::new(
                "stress_unique_index",
                "stress_index",
                10,
                ValueGenerator::constant(1),
            )
            .with_expected(ExpectedOutcome::DuplicateKeyFailure),
            // ~25 MB of identical values.
            Scenario::new(
                "stress_test_unique_index",
                "stress_index",
                2_000_000,
                ValueGenerator::constant(0),
            )
            .with_expected(ExpectedOutcome::DuplicateKeyFailure)
            .with_tags(&[ASSUMES_UNSHARDED_COLLECTION]),
            // ~15 MB of identical values.
            Scenario::new(
                "stress_test_unique_index_notunique",
                "stress_test_unique_index_notunique",
                500_000,
                ValueGenerator::constant(0),
            )
            .with_expected(ExpectedOutcome::DuplicateKeyFailure)
            .with_tags(&[ASSUMES_UNSHARDED_COLLECTION, REQUIRES_NON_RETRYABLE_WRITES])
            .skip_on_storage_engine(EPHEMERAL_FOR_TEST),
            // ~65 MB of distinct values.
            Scenario::new(
                "stress_test_unique_index_unique",
                "stress_test_unique_index_unique",
                2_000_000,
                ValueGenerator::sequential(0),
            )
            .with_expected(ExpectedOutcome::Success)
            .with_tags(&[ASSUMES_UNSHARDED_COLLECTION, REQUIRES_NON_RETRYABLE_WRITES]),
        ],
    }
}
