//! Document store abstraction.
//!
//! Every piece of site content lives in a named collection of JSON documents
//! (`Menu/main`, `Services/*`, `TiffinMenu/*`, ...). [`DocumentStore`] is the
//! narrow interface the rest of the system talks to: whole-document get, set,
//! merge, update and delete, collection listing with an optional order field,
//! and batched writes.
//!
//! Implementations:
//! - `kitchen_db::PgDocumentStore` -- Postgres JSONB, transactional batches.
//! - [`memory::MemoryDocumentStore`] -- in-process, used for local
//!   development and tests.

pub mod memory;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::types::DocId;

// ---------------------------------------------------------------------------
// Documents and write operations
// ---------------------------------------------------------------------------

/// A stored document: its id within the collection plus its JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub data: Value,
}

/// A single idempotent write, used to express commits as batches.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite the whole document.
    Set {
        collection: String,
        id: DocId,
        data: Value,
    },
    /// Create the document or overwrite only the given top-level fields.
    Merge {
        collection: String,
        id: DocId,
        fields: Value,
    },
    /// Remove the document. Deleting a missing document succeeds.
    Delete { collection: String, id: DocId },
}

impl WriteOp {
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Set { collection, .. }
            | WriteOp::Merge { collection, .. }
            | WriteOp::Delete { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Set { id, .. } | WriteOp::Merge { id, .. } | WriteOp::Delete { id, .. } => id,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document {collection}/{id} does not exist")]
    NotFound { collection: String, id: DocId },

    #[error("Document {collection}/{id} could not be decoded: {source}")]
    Decode {
        collection: String,
        id: DocId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document data must be a JSON object")]
    NotAnObject,

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// A batch that stopped part-way. `applied` writes (a prefix of the batch)
/// reached the store before `source` occurred.
#[derive(Debug, thiserror::Error)]
#[error("Batch stopped after {applied} of {total} writes: {source}")]
pub struct BatchError {
    pub applied: usize,
    pub total: usize,
    #[source]
    pub source: StoreError,
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// List a collection. With `order_by`, documents are sorted ascending by
    /// that top-level field; ties keep insertion order. Without it, insertion
    /// order is used.
    async fn list(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Create or overwrite a document.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Create a document or overwrite the given top-level fields of it.
    async fn merge(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Overwrite top-level fields of an existing document.
    /// Fails with [`StoreError::NotFound`] when the document is missing.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Insert a document under a store-generated id.
    async fn add(&self, collection: &str, data: Value) -> Result<DocId, StoreError>;

    /// Delete a document. Missing documents are not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Cheap connectivity check used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Apply a single write.
    async fn apply(&self, op: &WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Set {
                collection,
                id,
                data,
            } => self.set(collection, id, data.clone()).await,
            WriteOp::Merge {
                collection,
                id,
                fields,
            } => self.merge(collection, id, fields.clone()).await,
            WriteOp::Delete { collection, id } => self.delete(collection, id).await,
        }
    }

    /// Apply writes in order.
    ///
    /// The default implementation is not atomic: it stops at the first
    /// failure and reports how many writes were applied. Stores with
    /// transactions override this to apply all or nothing (`applied == 0`
    /// on failure).
    async fn apply_batch(&self, ops: &[WriteOp]) -> Result<(), BatchError> {
        for (applied, op) in ops.iter().enumerate() {
            if let Err(source) = self.apply(op).await {
                return Err(BatchError {
                    applied,
                    total: ops.len(),
                    source,
                });
            }
        }
        Ok(())
    }
}

/// Reject anything but a JSON object as document data.
pub fn ensure_object(data: &Value) -> Result<(), StoreError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject)
    }
}

/// Compare two documents by a top-level field for ordered listings.
///
/// Numbers compare numerically, strings lexically, booleans false < true.
/// Documents missing the field (or holding another type) sort after those
/// that have it.
pub fn compare_by_field(a: &Value, b: &Value, field: &str) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            Some(Value::Number(_)) => 0,
            Some(Value::String(_)) => 1,
            Some(Value::Bool(_)) => 2,
            _ => 3,
        }
    }

    let (x, y) = (a.get(field), b.get(field));
    match (x, y) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(x).cmp(&rank(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically() {
        let a = json!({ "order": 2 });
        let b = json!({ "order": 10 });
        assert_eq!(compare_by_field(&a, &b, "order"), Ordering::Less);
    }

    #[test]
    fn missing_field_sorts_last() {
        let a = json!({});
        let b = json!({ "order": 1 });
        assert_eq!(compare_by_field(&a, &b, "order"), Ordering::Greater);
        assert_eq!(compare_by_field(&a, &a, "order"), Ordering::Equal);
    }

    #[test]
    fn write_op_accessors() {
        let op = WriteOp::Delete {
            collection: "Ads".into(),
            id: "a1".into(),
        };
        assert_eq!(op.collection(), "Ads");
        assert_eq!(op.id(), "a1");
    }
}
