//! In-process [`DocumentStore`] keeping collections in insertion order.
//!
//! Batches are applied one write at a time (no transactions), which makes
//! this store the reference for resumable partial commits. Failure
//! injection hooks let tests simulate an unreachable backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{compare_by_field, ensure_object, Document, DocumentStore, StoreError};
use crate::types::{new_doc_id, DocId};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    fail_reads: AtomicBool,
    /// `Some(n)`: allow `n` more successful writes, then fail every write.
    writes_before_failure: Mutex<Option<usize>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Let `remaining` more writes succeed, then fail the rest.
    /// `None` restores normal behaviour.
    pub fn fail_writes_after(&self, remaining: Option<usize>) {
        *lock(&self.writes_before_failure) = remaining;
    }

    /// Number of writes that reached the store so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads are failing".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        let mut budget = lock(&self.writes_before_failure);
        match budget.as_mut() {
            Some(0) => Err(StoreError::Unavailable("writes are failing".into())),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn write<F>(&self, collection: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<Document>) -> Result<(), StoreError>,
    {
        self.check_write()?;
        let mut collections = lock(&self.collections);
        f(collections.entry(collection.to_string()).or_default())?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Overwrite `fields` on top of `target` (both JSON objects).
fn merge_fields(target: &mut Value, fields: Value) {
    if let (Some(target), Value::Object(fields)) = (target.as_object_mut(), fields) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check_read()?;
        let collections = lock(&self.collections);
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn list(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_read()?;
        let mut docs = lock(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default();
        if let Some(field) = order_by {
            // `sort_by` is stable, so ties keep insertion order.
            docs.sort_by(|a, b| compare_by_field(&a.data, &b.data, field));
        }
        Ok(docs)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        ensure_object(&data)?;
        self.write(collection, |docs| {
            match docs.iter_mut().find(|d| d.id == id) {
                Some(existing) => existing.data = data,
                None => docs.push(Document {
                    id: id.to_string(),
                    data,
                }),
            }
            Ok(())
        })
    }

    async fn merge(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        ensure_object(&fields)?;
        self.write(collection, |docs| {
            match docs.iter_mut().find(|d| d.id == id) {
                Some(existing) => merge_fields(&mut existing.data, fields),
                None => docs.push(Document {
                    id: id.to_string(),
                    data: fields,
                }),
            }
            Ok(())
        })
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        ensure_object(&fields)?;
        self.write(collection, |docs| {
            let existing =
                docs.iter_mut()
                    .find(|d| d.id == id)
                    .ok_or_else(|| StoreError::NotFound {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    })?;
            merge_fields(&mut existing.data, fields);
            Ok(())
        })
    }

    async fn add(&self, collection: &str, data: Value) -> Result<DocId, StoreError> {
        ensure_object(&data)?;
        let id = new_doc_id();
        self.write(collection, |docs| {
            docs.push(Document {
                id: id.clone(),
                data,
            });
            Ok(())
        })?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            docs.retain(|d| d.id != id);
            Ok(())
        })
    }
}
