//! How a draft maps onto the document store.
//!
//! Admin surfaces come in two shapes:
//! - a single document holding the whole draft ([`SingleDocument`]), e.g.
//!   `Menu/main` or `social/links`;
//! - a collection where every record is its own document ([`Collection`]),
//!   e.g. `Services/*` or `TiffinMenu/*`.
//!
//! Entity types opt in by implementing [`DocumentShape`] or [`Record`]; the
//! generic sources turn that into reads, write plans, normalization and
//! validation for [`DraftController`](super::DraftController).

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::store::{Document, StoreError, WriteOp};
use crate::types::{new_doc_id, DocId};

// ---------------------------------------------------------------------------
// DraftSource
// ---------------------------------------------------------------------------

/// What to fetch when (re)loading a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSpec {
    Document {
        collection: &'static str,
        id: &'static str,
    },
    Collection {
        collection: &'static str,
        order_by: Option<&'static str>,
    },
}

/// The raw remote state returned for a [`ReadSpec`].
#[derive(Debug, Clone)]
pub enum Snapshot {
    Document(Option<Document>),
    Collection(Vec<Document>),
}

/// Binds a draft type to its place in the document store.
pub trait DraftSource: Send + Sync + 'static {
    type Draft: Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Human-readable surface name used in messages ("menu", "services").
    fn surface(&self) -> &'static str;

    fn read_spec(&self) -> ReadSpec;

    fn decode(&self, snapshot: Snapshot) -> Result<Self::Draft, StoreError>;

    /// Writes that bring the remote state from `baseline` to `draft`.
    /// Every planned write must be idempotent.
    fn plan(&self, baseline: &Self::Draft, draft: &Self::Draft) -> Vec<WriteOp>;

    /// Fold `applied`, a prefix of `plan(baseline, draft)` that reached the
    /// store, into `baseline` so later plans diff against the stored state.
    fn settle(&self, baseline: &mut Self::Draft, draft: &Self::Draft, applied: &[WriteOp]);

    /// Runs after every local mutation.
    fn normalize(&self, _draft: &mut Self::Draft) {}

    /// Runs before a commit; a failure blocks all writes.
    fn validate(&self, _draft: &Self::Draft) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Single-document drafts
// ---------------------------------------------------------------------------

pub trait DocumentShape:
    Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const COLLECTION: &'static str;
    const DOC_ID: &'static str;
    const SURFACE: &'static str;
    /// Commit with a merge rather than an overwrite, preserving fields the
    /// shape does not model.
    const MERGE: bool = false;

    fn decode(data: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(data)
    }

    fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    fn normalize(&mut self) {}

    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

pub struct SingleDocument<T>(PhantomData<fn() -> T>);

impl<T> SingleDocument<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SingleDocument<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DocumentShape> DraftSource for SingleDocument<T> {
    type Draft = T;

    fn surface(&self) -> &'static str {
        T::SURFACE
    }

    fn read_spec(&self) -> ReadSpec {
        ReadSpec::Document {
            collection: T::COLLECTION,
            id: T::DOC_ID,
        }
    }

    fn decode(&self, snapshot: Snapshot) -> Result<T, StoreError> {
        match snapshot {
            Snapshot::Document(Some(doc)) => {
                T::decode(doc.data).map_err(|source| StoreError::Decode {
                    collection: T::COLLECTION.to_string(),
                    id: doc.id,
                    source,
                })
            }
            // A document that was never written loads as the default value.
            Snapshot::Document(None) | Snapshot::Collection(_) => Ok(T::default()),
        }
    }

    fn plan(&self, baseline: &T, draft: &T) -> Vec<WriteOp> {
        if baseline == draft {
            return Vec::new();
        }
        let collection = T::COLLECTION.to_string();
        let id = T::DOC_ID.to_string();
        let op = if T::MERGE {
            WriteOp::Merge {
                collection,
                id,
                fields: draft.encode(),
            }
        } else {
            WriteOp::Set {
                collection,
                id,
                data: draft.encode(),
            }
        };
        vec![op]
    }

    fn settle(&self, baseline: &mut T, draft: &T, applied: &[WriteOp]) {
        if !applied.is_empty() {
            *baseline = draft.clone();
        }
    }

    fn normalize(&self, draft: &mut T) {
        draft.normalize();
    }

    fn validate(&self, draft: &T) -> Result<(), CoreError> {
        draft.validate()
    }
}

// ---------------------------------------------------------------------------
// Collection drafts
// ---------------------------------------------------------------------------

pub trait Record:
    Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const COLLECTION: &'static str;
    const SURFACE: &'static str;
    /// Field the collection is listed by, ascending.
    const ORDER_BY: Option<&'static str> = None;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: DocId);

    /// Decode a stored document; the document id becomes the record id.
    fn decode(id: &str, mut data: Value) -> Result<Self, serde_json::Error> {
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".into(), Value::String(id.to_string()));
        }
        serde_json::from_value(data)
    }

    /// Encode for storage. The id is the document key, not a field.
    fn encode(&self) -> Value {
        let mut data = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = data.as_object_mut() {
            obj.remove("id");
        }
        data
    }

    fn normalize(&mut self) {}

    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

pub struct Collection<T>(PhantomData<fn() -> T>);

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> DraftSource for Collection<T> {
    type Draft = Vec<T>;

    fn surface(&self) -> &'static str {
        T::SURFACE
    }

    fn read_spec(&self) -> ReadSpec {
        ReadSpec::Collection {
            collection: T::COLLECTION,
            order_by: T::ORDER_BY,
        }
    }

    fn decode(&self, snapshot: Snapshot) -> Result<Vec<T>, StoreError> {
        let docs = match snapshot {
            Snapshot::Collection(docs) => docs,
            Snapshot::Document(doc) => doc.into_iter().collect(),
        };
        docs.into_iter()
            .map(|doc| {
                T::decode(&doc.id, doc.data).map_err(|source| StoreError::Decode {
                    collection: T::COLLECTION.to_string(),
                    id: doc.id.clone(),
                    source,
                })
            })
            .collect()
    }

    fn plan(&self, baseline: &Vec<T>, draft: &Vec<T>) -> Vec<WriteOp> {
        let before: HashMap<&str, &T> = baseline.iter().map(|r| (r.id(), r)).collect();
        let kept: HashSet<&str> = draft.iter().map(Record::id).collect();

        let mut ops: Vec<WriteOp> = baseline
            .iter()
            .filter(|r| !kept.contains(r.id()))
            .map(|r| WriteOp::Delete {
                collection: T::COLLECTION.to_string(),
                id: r.id().to_string(),
            })
            .collect();

        ops.extend(
            draft
                .iter()
                .filter(|r| before.get(r.id()).copied() != Some(*r))
                .map(|r| WriteOp::Set {
                    collection: T::COLLECTION.to_string(),
                    id: r.id().to_string(),
                    data: r.encode(),
                }),
        );
        ops
    }

    fn settle(&self, baseline: &mut Vec<T>, draft: &Vec<T>, applied: &[WriteOp]) {
        for op in applied {
            match op {
                WriteOp::Delete { id, .. } => baseline.retain(|r| r.id() != id),
                WriteOp::Set { id, .. } | WriteOp::Merge { id, .. } => {
                    let Some(record) = draft.iter().find(|r| r.id() == id) else {
                        continue;
                    };
                    match baseline.iter_mut().find(|r| r.id() == id) {
                        Some(stored) => *stored = record.clone(),
                        None => baseline.push(record.clone()),
                    }
                }
            }
        }
    }

    /// Assigns ids to new records (and to records whose id duplicates an
    /// earlier one), then normalizes each record.
    fn normalize(&self, draft: &mut Vec<T>) {
        let mut seen = HashSet::new();
        for record in draft.iter_mut() {
            if record.id().is_empty() || !seen.insert(record.id().to_string()) {
                let id = new_doc_id();
                seen.insert(id.clone());
                record.set_id(id);
            }
            record.normalize();
        }
    }

    fn validate(&self, draft: &Vec<T>) -> Result<(), CoreError> {
        draft.iter().try_for_each(Record::validate)
    }
}
