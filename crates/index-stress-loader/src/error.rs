//! Error types for the loader.

use crate::metrics::LoadResult;
use index_stress_core::ClientError;
use thiserror::Error;

/// Errors that can occur while loading a collection.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Invalid loader parameters. Raised before any remote call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bulk insert failed. Earlier batches stay committed.
    #[error(
        "Bulk insert into '{collection}' failed after {} documents in {} batches: {source}",
        partial.documents_inserted,
        partial.batch_count
    )]
    Insert {
        collection: String,
        partial: LoadResult,
        #[source]
        source: ClientError,
    },
}

impl LoaderError {
    /// Progress made before the loader aborted, if it got that far.
    pub fn partial(&self) -> Option<&LoadResult> {
        match self {
            LoaderError::Config(_) => None,
            LoaderError::Insert { partial, .. } => Some(partial),
        }
    }
}
