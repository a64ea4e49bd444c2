//! Document store contract and backends.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{docmodel_schema, ensure_database_exists, qualified_table, PgDocumentStore};

use crate::document::{DeleteOutcome, Document};
use crate::error::StoreError;
use async_trait::async_trait;

/// What a model needs from a document database. The store owns `id` and `revision`:
/// it assigns both on write and rejects writes and deletes against a stale revision.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when no document has this id.
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or update. Returns the stored document with `id` and `revision` set.
    async fn put_document(&self, doc: Document) -> Result<Document, StoreError>;

    /// Delete the document at its current `id`/`revision`.
    async fn delete_document(&self, doc: &Document) -> Result<DeleteOutcome, StoreError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Revision that follows `current`: `"<n+1>-<32 hex>"`, starting at 1.
pub(crate) fn next_revision(current: Option<&str>) -> String {
    let n = current
        .and_then(|r| r.split('-').next())
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-{}", n + 1, uuid::Uuid::new_v4().simple())
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Revision check for a write: new documents must not carry a revision,
/// existing ones must carry the current one.
pub(crate) fn check_revision(
    id: &str,
    current: Option<&str>,
    supplied: Option<&str>,
) -> Result<(), StoreError> {
    match (current, supplied) {
        (None, None) => Ok(()),
        (Some(cur), Some(given)) if cur == given => Ok(()),
        _ => Err(StoreError::Conflict { id: id.to_string() }),
    }
}
