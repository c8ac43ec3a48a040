//! Database client abstraction.

use crate::document::Document;
use crate::error::ClientError;
use crate::index::IndexSpec;
use async_trait::async_trait;

/// The operations the harness needs from the database under test.
///
/// Every call is a single blocking unit from the harness's point of view:
/// the caller awaits it to completion before issuing the next one.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Drop a collection. Dropping a missing collection is not an error.
    async fn drop_collection(&self, collection: &str) -> Result<(), ClientError>;

    /// Insert all documents in one bulk request, returning the inserted count.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<u64, ClientError>;

    /// Build an index on an existing collection.
    async fn create_index(&self, collection: &str, spec: &IndexSpec) -> Result<(), ClientError>;

    /// Number of documents in a collection.
    async fn count(&self, collection: &str) -> Result<u64, ClientError>;

    /// Name of the server's storage engine, when the client can tell.
    async fn storage_engine(&self) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}
