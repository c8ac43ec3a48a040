//! Error types for the validator.

use crate::validator::IndexOutcome;
use index_stress_core::ExpectedOutcome;
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// The index build did not end the way the scenario expected.
    #[error("Assertion failed on '{collection}': expected {expected}, got {actual}")]
    Assertion {
        collection: String,
        expected: ExpectedOutcome,
        actual: IndexOutcome,
    },
}

impl ValidatorError {
    pub fn actual(&self) -> &IndexOutcome {
        match self {
            ValidatorError::Assertion { actual, .. } => actual,
        }
    }
}
