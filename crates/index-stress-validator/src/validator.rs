//! Create-index request and outcome classification.

use crate::error::ValidatorError;
use index_stress_core::{ClientError, DatabaseClient, ExpectedOutcome, IndexSpec};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What actually happened when the index was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexOutcome {
    Built,
    DuplicateKey { message: String },
    Error { code: Option<i32>, message: String },
}

impl IndexOutcome {
    pub fn matches(&self, expected: ExpectedOutcome) -> bool {
        matches!(
            (self, expected),
            (IndexOutcome::Built, ExpectedOutcome::Success)
                | (
                    IndexOutcome::DuplicateKey { .. },
                    ExpectedOutcome::DuplicateKeyFailure
                )
        )
    }
}

impl From<Result<(), ClientError>> for IndexOutcome {
    fn from(result: Result<(), ClientError>) -> Self {
        match result {
            Ok(()) => IndexOutcome::Built,
            Err(ClientError::DuplicateKey { message, .. }) => IndexOutcome::DuplicateKey { message },
            Err(ClientError::Transport { code, message }) => IndexOutcome::Error { code, message },
        }
    }
}

impl std::fmt::Display for IndexOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexOutcome::Built => write!(f, "index built"),
            IndexOutcome::DuplicateKey { message } => write!(f, "duplicate-key failure ({message})"),
            IndexOutcome::Error {
                code: Some(code),
                message,
            } => write!(f, "error {code}: {message}"),
            IndexOutcome::Error {
                code: None,
                message,
            } => write!(f, "error: {message}"),
        }
    }
}

/// Builds an index on one collection and checks the outcome.
pub struct Validator<'a, C: DatabaseClient + ?Sized> {
    client: &'a C,
    collection: String,
}

impl<'a, C: DatabaseClient + ?Sized> Validator<'a, C> {
    pub fn new(client: &'a C, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    /// Issue a single create-index request and classify the response.
    pub async fn build_index(&self, spec: &IndexSpec) -> (IndexOutcome, Duration) {
        info!(
            "Creating index {} (unique: {}) on '{}'",
            spec.name(),
            spec.unique,
            self.collection
        );
        let start = Instant::now();
        let outcome = IndexOutcome::from(self.client.create_index(&self.collection, spec).await);
        (outcome, start.elapsed())
    }

    /// Build `spec` and assert the outcome is `expected`.
    ///
    /// With `Success` any error fails the assertion, transient ones
    /// included. With `DuplicateKeyFailure` only the duplicate-key
    /// classification passes.
    pub async fn validate_unique_index(
        &self,
        spec: &IndexSpec,
        expected: ExpectedOutcome,
    ) -> Result<IndexOutcome, ValidatorError> {
        let (outcome, elapsed) = self.build_index(spec).await;

        if outcome.matches(expected) {
            info!(
                "Index build on '{}' ended as expected in {:?}: {}",
                self.collection, elapsed, outcome
            );
            Ok(outcome)
        } else {
            warn!(
                "Index build on '{}' expected {}, got {}",
                self.collection, expected, outcome
            );
            Err(ValidatorError::Assertion {
                collection: self.collection.clone(),
                expected,
                actual: outcome,
            })
        }
    }
}
