//! Batched bulk-insert loop.

use crate::error::LoaderError;
use crate::metrics::LoadResult;
use index_stress_core::{ClientError, DatabaseClient, Document, DEFAULT_CHUNK_SIZE};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sizes of the batches needed to insert `target_count` documents with at
/// most `chunk_size` documents each. Only the last batch may be short.
pub fn plan_batches(target_count: u64, chunk_size: u64) -> impl Iterator<Item = u64> {
    let chunk_size = chunk_size.max(1);
    let mut remaining = target_count;
    std::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let batch = remaining.min(chunk_size);
        remaining -= batch;
        Some(batch)
    })
}

fn validate_chunk_size(chunk_size: i64) -> Result<u64, LoaderError> {
    if chunk_size <= 0 {
        return Err(LoaderError::Config(format!(
            "chunk size must be at least 1, got {chunk_size}"
        )));
    }
    Ok(chunk_size as u64)
}

/// Loads generated documents into one collection.
///
/// The insertion index keeps running across [`Loader::load`] calls, so a
/// second pass with a sequential generator continues where the first
/// stopped. Create a new loader to start again from index 0.
pub struct Loader<'a, C: DatabaseClient + ?Sized> {
    client: &'a C,
    collection: String,
    chunk_size: i64,
    next_index: u64,
}

impl<'a, C: DatabaseClient + ?Sized> Loader<'a, C> {
    pub fn new(client: &'a C, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            next_index: 0,
        }
    }

    /// Set the maximum number of documents per bulk insert.
    ///
    /// The value is checked when loading, so an invalid size is reported
    /// as a configuration error rather than a panic.
    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Index the next generated document will get.
    pub fn current_index(&self) -> u64 {
        self.next_index
    }

    /// Insert `target_count` documents whose field `a` is `generator(index)`.
    ///
    /// Aborts on the first failed batch and reports how far it got. A batch
    /// the server only partly acknowledges counts as failed. There is no
    /// retry and nothing already inserted is removed.
    pub async fn load<F>(&mut self, target_count: u64, generator: F) -> Result<LoadResult, LoaderError>
    where
        F: Fn(u64) -> i64,
    {
        let chunk_size = validate_chunk_size(self.chunk_size)?;
        if self.next_index.checked_add(target_count).is_none() {
            return Err(LoaderError::Config(format!(
                "{} more documents would overflow the insertion index {}",
                target_count, self.next_index
            )));
        }
        let start_time = Instant::now();
        let mut result = LoadResult::default();

        info!(
            "Loading collection '{}' with {} documents (chunk size: {})",
            self.collection, target_count, chunk_size
        );

        let mut generation_time = Duration::ZERO;
        let mut insert_time = Duration::ZERO;

        for batch_len in plan_batches(target_count, chunk_size) {
            let gen_start = Instant::now();
            let first = self.next_index;
            let documents: Vec<Document> = (first..first + batch_len)
                .map(|index| Document::new(generator(index)))
                .collect();
            generation_time += gen_start.elapsed();

            let insert_start = Instant::now();
            let inserted = self
                .client
                .insert_many(&self.collection, documents)
                .await;
            insert_time += insert_start.elapsed();

            let inserted = match inserted {
                Ok(n) if n == batch_len => n,
                Ok(n) => {
                    self.next_index += batch_len;
                    result.documents_inserted += n;
                    result.total_duration = start_time.elapsed();
                    result.generation_duration = generation_time;
                    result.insert_duration = insert_time;
                    return Err(LoaderError::Insert {
                        collection: self.collection.clone(),
                        partial: result,
                        source: ClientError::transport(format!(
                            "server acknowledged {n} of {batch_len} documents"
                        )),
                    });
                }
                Err(source) => {
                    result.total_duration = start_time.elapsed();
                    result.generation_duration = generation_time;
                    result.insert_duration = insert_time;
                    return Err(LoaderError::Insert {
                        collection: self.collection.clone(),
                        partial: result,
                        source,
                    });
                }
            };

            self.next_index += batch_len;
            result.documents_inserted += inserted;
            result.batch_count += 1;
            result.batch_sizes.push(inserted);

            debug!(
                "Batch {} complete: {} documents inserted, {} remaining",
                result.batch_count,
                inserted,
                target_count.saturating_sub(result.documents_inserted)
            );
        }

        result.total_duration = start_time.elapsed();
        result.generation_duration = generation_time;
        result.insert_duration = insert_time;

        info!(
            "Load complete: {} documents in {:?} ({:.2} docs/sec)",
            result.documents_inserted,
            result.total_duration,
            result.documents_per_second()
        );

        Ok(result)
    }

    /// Insert with an explicit chunk size, leaving the configured one alone.
    pub async fn load_with_chunk_size<F>(
        &mut self,
        target_count: u64,
        chunk_size: i64,
        generator: F,
    ) -> Result<LoadResult, LoaderError>
    where
        F: Fn(u64) -> i64,
    {
        let configured = std::mem::replace(&mut self.chunk_size, chunk_size);
        let result = self.load(target_count, generator).await;
        self.chunk_size = configured;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use index_stress_core::{DatabaseClient, IndexSpec, MemoryClient, ValueGenerator};
    use proptest::prelude::*;

    /// Acknowledges one document fewer than it is sent once the batch is large enough.
    struct ShortAckClient;

    #[async_trait]
    impl DatabaseClient for ShortAckClient {
        async fn drop_collection(&self, _: &str) -> Result<(), ClientError> {
            Ok(())
        }

        async fn insert_many(&self, _: &str, documents: Vec<Document>) -> Result<u64, ClientError> {
            let len = documents.len() as u64;
            Ok(if len > 2 { len - 1 } else { len })
        }

        async fn create_index(&self, _: &str, _: &IndexSpec) -> Result<(), ClientError> {
            Ok(())
        }

        async fn count(&self, _: &str) -> Result<u64, ClientError> {
            Ok(0)
        }
    }

    #[test]
    fn test_plan_batches() {
        assert_eq!(plan_batches(0, 10).collect::<Vec<_>>(), Vec::<u64>::new());
        assert_eq!(plan_batches(10, 100_000).collect::<Vec<_>>(), vec![10]);
        assert_eq!(plan_batches(25, 10).collect::<Vec<_>>(), vec![10, 10, 5]);
        assert_eq!(plan_batches(20, 10).collect::<Vec<_>>(), vec![10, 10]);
        assert_eq!(plan_batches(2_000_000, 100_000).count(), 20);
    }

    proptest! {
        #[test]
        fn prop_batches_are_exact(target in 0u64..50_000, chunk in 1u64..5_000) {
            let batches: Vec<u64> = plan_batches(target, chunk).collect();
            prop_assert_eq!(batches.iter().sum::<u64>(), target);
            prop_assert!(batches.iter().all(|&b| b >= 1 && b <= chunk));
            if let Some((_, head)) = batches.split_last() {
                prop_assert!(head.iter().all(|&b| b == chunk));
            }
        }

        #[test]
        fn prop_load_inserts_exactly_target(target in 0u64..2_000, chunk in 1i64..300) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let client = MemoryClient::new();
                let before = client.count("c").await.unwrap();
                let mut loader = Loader::new(&client, "c").with_chunk_size(chunk);
                let result = loader.load(target, |i| i as i64).await.unwrap();
                let after = client.count("c").await.unwrap();

                assert_eq!(after - before, target);
                assert_eq!(result.documents_inserted, target);
                let sizes = client.batch_sizes().await;
                assert_eq!(sizes.iter().map(|&s| s as u64).sum::<u64>(), target);
                assert!(sizes.iter().all(|&s| s as i64 <= chunk));
                assert!(sizes.iter().rev().skip(1).all(|&s| s as i64 == chunk));
            });
        }
    }

    #[tokio::test]
    async fn test_non_positive_chunk_size_is_config_error() {
        let client = MemoryClient::new();
        for chunk in [0, -1, i64::MIN] {
            let mut loader = Loader::new(&client, "c").with_chunk_size(chunk);
            let err = loader.load(10, |_| 0).await.unwrap_err();
            assert!(matches!(err, LoaderError::Config(_)), "{err}");
            assert!(err.partial().is_none());
        }
        // Nothing reached the client.
        assert!(client.batch_sizes().await.is_empty());
        assert_eq!(client.count("c").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_target_makes_no_calls() {
        let client = MemoryClient::new();
        let mut loader = Loader::new(&client, "c");
        let result = loader.load(0, |_| 0).await.unwrap();
        assert_eq!(result.documents_inserted, 0);
        assert_eq!(result.batch_count, 0);
        assert!(client.batch_sizes().await.is_empty());
    }

    #[tokio::test]
    async fn test_abort_reports_partial_progress() {
        let client = MemoryClient::new().with_insert_failure_on_call(3);
        let mut loader = Loader::new(&client, "c").with_chunk_size(4);
        let err = loader.load(20, |_| 0).await.unwrap_err();

        let partial = err.partial().unwrap();
        assert_eq!(partial.documents_inserted, 8);
        assert_eq!(partial.batch_count, 2);
        assert!(matches!(
            err,
            LoaderError::Insert { ref source, .. } if !source.is_duplicate_key()
        ));
        // No retry and no rollback.
        assert_eq!(client.count("c").await.unwrap(), 8);
        assert_eq!(loader.current_index(), 8);
    }

    #[tokio::test]
    async fn test_index_continues_across_loads() {
        let client = MemoryClient::new();
        let generator = ValueGenerator::sequential(0);
        let mut loader = Loader::new(&client, "c").with_chunk_size(3);
        loader.load(5, generator.as_fn()).await.unwrap();
        loader.load(5, generator.as_fn()).await.unwrap();
        assert_eq!(loader.current_index(), 10);
        assert_eq!(client.count("c").await.unwrap(), 10);
        client
            .create_index("c", &Default::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_load_with_chunk_size_keeps_configured_size() {
        let client = MemoryClient::new();
        let mut loader = Loader::new(&client, "c").with_chunk_size(2);
        loader.load_with_chunk_size(5, 5, |_| 0).await.unwrap();
        loader.load(3, |_| 0).await.unwrap();
        assert_eq!(client.batch_sizes().await, vec![5, 2, 1]);
    }

    #[tokio::test]
    async fn test_short_acknowledgement_aborts_with_partial_count() {
        let client = ShortAckClient;
        let mut loader = Loader::new(&client, "c").with_chunk_size(2);
        loader.load(4, |_| 0).await.unwrap();

        let mut loader = Loader::new(&client, "c").with_chunk_size(5);
        let err = loader.load(12, |_| 0).await.unwrap_err();
        let partial = err.partial().unwrap();
        assert_eq!(partial.documents_inserted, 4);
        assert_eq!(partial.batch_count, 0);
        assert!(err.to_string().contains("acknowledged 4 of 5 documents"));
    }

    #[tokio::test]
    async fn test_index_overflow_is_config_error() {
        let client = MemoryClient::new();
        let mut loader = Loader::new(&client, "c").with_chunk_size(1);
        loader.load(3, |i| i as i64).await.unwrap();

        let err = loader.load(u64::MAX, |i| i as i64).await.unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)), "{err}");
        assert_eq!(client.count("c").await.unwrap(), 3);
        assert_eq!(loader.current_index(), 3);
    }
}
