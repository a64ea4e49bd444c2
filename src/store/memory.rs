//! InMemoryStore - HashMap-backed document store for tests and development.

use super::{check_revision, new_document_id, next_revision, DocumentStore};
use crate::document::{doc_id, doc_revision, DeleteOutcome, Document, ID_FIELD, REVISION_FIELD};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Clone-friendly via Arc; clones share the same documents.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    docs: Arc<RwLock<HashMap<String, Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let docs = self.docs.read().map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(docs.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read().map_err(|_| StoreError::LockPoisoned("get"))?;
        Ok(docs.get(id).cloned())
    }

    async fn put_document(&self, mut doc: Document) -> Result<Document, StoreError> {
        let id = doc_id(&doc).map(str::to_string).unwrap_or_else(new_document_id);
        let mut docs = self.docs.write().map_err(|_| StoreError::LockPoisoned("put"))?;
        let current = docs.get(&id).and_then(doc_revision);
        if let Err(e) = check_revision(&id, current, doc_revision(&doc)) {
            tracing::warn!(id = %id, "put conflict");
            return Err(e);
        }
        let revision = next_revision(current);
        doc.insert(ID_FIELD.into(), Value::String(id.clone()));
        doc.insert(REVISION_FIELD.into(), Value::String(revision));
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    async fn delete_document(&self, doc: &Document) -> Result<DeleteOutcome, StoreError> {
        let id = doc_id(doc).ok_or(StoreError::MissingField(ID_FIELD))?;
        let supplied = doc_revision(doc).ok_or(StoreError::MissingField(REVISION_FIELD))?;
        let mut docs = self.docs.write().map_err(|_| StoreError::LockPoisoned("delete"))?;
        let current = docs
            .get(id)
            .and_then(doc_revision)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if current != supplied {
            tracing::warn!(id = %id, "delete conflict");
            return Err(StoreError::Conflict { id: id.to_string() });
        }
        let revision = next_revision(Some(current));
        docs.remove(id);
        Ok(DeleteOutcome {
            id: id.to_string(),
            revision,
        })
    }
}
