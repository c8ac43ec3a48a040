//! Load results.

use serde::Serialize;
use std::time::Duration;

/// Outcome of a load call, complete or partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadResult {
    /// Number of documents the server acknowledged.
    pub documents_inserted: u64,
    /// Number of bulk inserts that succeeded.
    pub batch_count: u64,
    /// Size of each successful batch, in submission order.
    pub batch_sizes: Vec<u64>,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent building documents.
    pub generation_duration: Duration,
    /// Time spent waiting on bulk inserts.
    pub insert_duration: Duration,
}

impl LoadResult {
    /// Calculate documents per second.
    pub fn documents_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.documents_inserted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: LoadResult) {
        self.documents_inserted += other.documents_inserted;
        self.batch_count += other.batch_count;
        self.batch_sizes.extend(other.batch_sizes);
        self.total_duration += other.total_duration;
        self.generation_duration += other.generation_duration;
        self.insert_duration += other.insert_duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_per_second() {
        let result = LoadResult {
            documents_inserted: 1000,
            batch_count: 10,
            total_duration: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(result.documents_per_second(), 100.0);
        assert_eq!(LoadResult::default().documents_per_second(), 0.0);
    }

    #[test]
    fn test_merge() {
        let mut first = LoadResult {
            documents_inserted: 3,
            batch_count: 2,
            batch_sizes: vec![2, 1],
            ..Default::default()
        };
        first.merge(LoadResult {
            documents_inserted: 2,
            batch_count: 1,
            batch_sizes: vec![2],
            ..Default::default()
        });
        assert_eq!(first.documents_inserted, 5);
        assert_eq!(first.batch_sizes, vec![2, 1, 2]);
    }
}
