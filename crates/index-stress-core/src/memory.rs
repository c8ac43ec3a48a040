//! In-process database client.
//!
//! `MemoryClient` keeps collections in memory and enforces unique-index
//! builds the way a document store does: a field missing from a document
//! is indexed as `null`, so a unique index over an absent field collides as
//! soon as two documents exist. It also records the size of every bulk
//! insert and can inject a transport failure on a chosen insert call, which
//! makes it the backend for harness tests and `run memory`.

use crate::client::DatabaseClient;
use crate::document::Document;
use crate::error::{ClientError, INDEX_KEY_SPECS_CONFLICT_CODE};
use crate::index::IndexSpec;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    indexes: Vec<IndexSpec>,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Collection>,
    insert_calls: u64,
    batch_sizes: Vec<usize>,
}

/// In-memory implementation of [`DatabaseClient`].
#[derive(Debug, Default)]
pub struct MemoryClient {
    state: Mutex<State>,
    fail_insert_call: Option<u64>,
    storage_engine: Option<String>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `call`-th insert (1-based) with a transport error.
    pub fn with_insert_failure_on_call(mut self, call: u64) -> Self {
        self.fail_insert_call = Some(call);
        self
    }

    /// Report `name` from [`DatabaseClient::storage_engine`].
    pub fn with_storage_engine(mut self, name: impl Into<String>) -> Self {
        self.storage_engine = Some(name.into());
        self
    }

    /// Sizes of all successful bulk inserts, in submission order.
    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.state.lock().await.batch_sizes.clone()
    }

    /// Indexes currently defined on a collection.
    pub async fn indexes(&self, collection: &str) -> Vec<IndexSpec> {
        self.state
            .lock()
            .await
            .collections
            .get(collection)
            .map(|c| c.indexes.clone())
            .unwrap_or_default()
    }

    /// Insert `documents` without going through the bulk-insert bookkeeping.
    pub async fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        let mut state = self.state.lock().await;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .documents
            .extend(documents);
    }
}

/// Find the first key shared by two documents, where a missing field is `None`.
fn first_duplicate(documents: &[Document], field: &str) -> Option<Option<i64>> {
    let mut seen = HashSet::with_capacity(documents.len());
    documents
        .iter()
        .map(|doc| doc.get(field))
        .find(|key| !seen.insert(*key))
}

fn describe_key(key: Option<i64>) -> String {
    key.map(|v| v.to_string())
        .unwrap_or_else(|| "null".to_string())
}

#[async_trait]
impl DatabaseClient for MemoryClient {
    async fn drop_collection(&self, collection: &str) -> Result<(), ClientError> {
        self.state.lock().await.collections.remove(collection);
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<u64, ClientError> {
        let mut state = self.state.lock().await;
        state.insert_calls += 1;
        if self.fail_insert_call == Some(state.insert_calls) {
            return Err(ClientError::transport(format!(
                "injected failure on insert call {}",
                state.insert_calls
            )));
        }

        let coll = state.collections.entry(collection.to_string()).or_default();

        // Existing unique indexes reject the whole batch, as an ordered insert would.
        for index in coll.indexes.iter().filter(|i| i.unique) {
            let mut combined = coll.documents.clone();
            combined.extend(documents.iter().copied());
            if let Some(key) = first_duplicate(&combined, &index.field) {
                return Err(ClientError::duplicate_key(format!(
                    "E11000 duplicate key error collection: {collection} index: {} dup key: {{ {}: {} }}",
                    index.name(),
                    index.field,
                    describe_key(key)
                )));
            }
        }

        let inserted = documents.len();
        coll.documents.extend(documents);
        state.batch_sizes.push(inserted);
        debug!("memory: inserted {} documents into {}", inserted, collection);
        Ok(inserted as u64)
    }

    async fn create_index(&self, collection: &str, spec: &IndexSpec) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        let coll = state.collections.entry(collection.to_string()).or_default();

        if let Some(existing) = coll.indexes.iter().find(|i| i.name() == spec.name()) {
            if existing == spec {
                return Ok(());
            }
            return Err(ClientError::Transport {
                code: Some(INDEX_KEY_SPECS_CONFLICT_CODE),
                message: format!(
                    "Index with name: {} already exists with different options",
                    spec.name()
                ),
            });
        }

        if spec.unique {
            if let Some(key) = first_duplicate(&coll.documents, &spec.field) {
                return Err(ClientError::duplicate_key(format!(
                    "Index build failed: E11000 duplicate key error collection: {collection} index: {} dup key: {{ {}: {} }}",
                    spec.name(),
                    spec.field,
                    describe_key(key)
                )));
            }
        }

        coll.indexes.push(spec.clone());
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<u64, ClientError> {
        let state = self.state.lock().await;
        Ok(state
            .collections
            .get(collection)
            .map(|c| c.documents.len() as u64)
            .unwrap_or(0))
    }

    async fn storage_engine(&self) -> Result<Option<String>, ClientError> {
        Ok(self.storage_engine.clone())
    }
}
