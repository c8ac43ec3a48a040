//! Chunked bulk loader.
//!
//! The loader fills a collection with `target_count` generated documents,
//! submitting them in batches of at most `chunk_size` documents. Every
//! batch is a single `insert_many` call; the last batch is trimmed so the
//! total lands exactly on the target.
//!
//! # Example
//!
//! ```ignore
//! use index_stress_core::{MemoryClient, ValueGenerator};
//! use index_stress_loader::Loader;
//!
//! let client = MemoryClient::new();
//! let mut loader = Loader::new(&client, "stress_index").with_chunk_size(100_000);
//! let result = loader.load(10, ValueGenerator::constant(1).as_fn()).await?;
//! assert_eq!(result.documents_inserted, 10);
//! ```

pub mod error;
pub mod loader;
pub mod metrics;

pub use error::LoaderError;
pub use loader::{plan_batches, Loader};
pub use metrics::LoadResult;
