//! Value generation policies for the indexed field.

use serde::{Deserialize, Serialize};

/// Maps a running insertion index to the value of field `a`.
///
/// Generators are pure: the same index always yields the same value, so a
/// scenario's uniqueness property is known before any data is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueGenerator {
    /// Every document gets the same value.
    Constant { value: i64 },
    /// Document `i` gets `start + i`.
    Sequential {
        #[serde(default)]
        start: i64,
    },
}

impl ValueGenerator {
    pub fn constant(value: i64) -> Self {
        ValueGenerator::Constant { value }
    }

    pub fn sequential(start: i64) -> Self {
        ValueGenerator::Sequential { start }
    }

    pub fn value_at(&self, index: u64) -> i64 {
        match *self {
            ValueGenerator::Constant { value } => value,
            ValueGenerator::Sequential { start } => start.wrapping_add(index as i64),
        }
    }

    /// Whether `count` consecutive indices starting at `first` produce
    /// pairwise-distinct values.
    pub fn is_unique_over(&self, first: u64, count: u64) -> bool {
        match self {
            ValueGenerator::Constant { .. } => count < 2,
            ValueGenerator::Sequential { .. } => first.checked_add(count).is_some(),
        }
    }

    /// Borrow this generator as a plain closure.
    pub fn as_fn(&self) -> impl Fn(u64) -> i64 + Send + Sync + '_ {
        move |index| self.value_at(index)
    }
}

impl std::fmt::Display for ValueGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueGenerator::Constant { value } => write!(f, "constant({value})"),
            ValueGenerator::Sequential { start } => write!(f, "sequential(start={start})"),
        }
    }
}
