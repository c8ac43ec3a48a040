//! The single-field document inserted by the loader.

use serde::{Deserialize, Serialize};

/// Name of the field every generated document carries.
pub const DEFAULT_FIELD: &str = "a";

/// A generated document: `{ "a": <value> }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    pub a: i64,
}

impl Document {
    pub fn new(a: i64) -> Self {
        Self { a }
    }

    /// Value of `field`, or `None` when the document does not carry it.
    pub fn get(&self, field: &str) -> Option<i64> {
        (field == DEFAULT_FIELD).then_some(self.a)
    }
}
