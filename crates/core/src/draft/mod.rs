//! Draft-Edit-Commit lifecycle shared by every admin editing surface.
//!
//! A [`DraftController`] holds two copies of one surface's content: the
//! `baseline` (last state known to be in the store) and the `draft` (what the
//! admin is editing). Phases:
//!
//! ```text
//! Loading -> Viewing <-> Editing -> Committing -> Viewing
//!                        Editing -> Discarding -> Viewing
//! ```
//!
//! Local edits never touch the store. A commit writes the difference between
//! baseline and draft as one batch; a failed batch keeps the draft, moves
//! the writes that landed into the baseline and remembers the rest so a
//! retry resumes from there.

pub mod edit;
pub mod source;

use serde::Serialize;

use crate::error::CoreError;
use crate::store::{BatchError, DocumentStore, StoreError, WriteOp};

pub use edit::{apply_edits, FieldEdit};
pub use source::{Collection, DocumentShape, DraftSource, ReadSpec, Record, SingleDocument, Snapshot};

// ---------------------------------------------------------------------------
// Errors and reports
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Failed to load {surface}: {source}")]
    Fetch {
        surface: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save {surface} ({written} of {total} writes applied): {source}")]
    Commit {
        surface: &'static str,
        written: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    #[error("Invalid {surface}: {reason}")]
    Validation {
        surface: &'static str,
        reason: String,
    },

    #[error("{surface} must be loaded before it can be saved")]
    NotLoaded { surface: &'static str },
}

impl DraftError {
    pub fn surface(&self) -> &'static str {
        match self {
            DraftError::Fetch { surface, .. }
            | DraftError::Commit { surface, .. }
            | DraftError::Validation { surface, .. }
            | DraftError::NotLoaded { surface } => surface,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Viewing,
    Editing,
    Committing,
    Discarding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub surface: &'static str,
    /// Writes applied by this commit.
    pub written: usize,
    /// `true` when this commit finished the remainder of an earlier
    /// partially applied one.
    pub resumed: bool,
}

/// Serializable snapshot of a controller for API responses.
#[derive(Debug, Serialize)]
pub struct DraftView<'a, D: Serialize> {
    pub surface: &'static str,
    pub phase: Phase,
    pub dirty: bool,
    pub pending_writes: usize,
    pub draft: &'a D,
}

struct PendingCommit<D> {
    draft: D,
    remaining: Vec<WriteOp>,
}

// ---------------------------------------------------------------------------
// DraftController
// ---------------------------------------------------------------------------

pub struct DraftController<S: DraftSource> {
    source: S,
    phase: Phase,
    loaded: bool,
    baseline: S::Draft,
    draft: S::Draft,
    pending: Option<PendingCommit<S::Draft>>,
}

impl<S: DraftSource> DraftController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            phase: Phase::Loading,
            loaded: false,
            baseline: S::Draft::default(),
            draft: S::Draft::default(),
            pending: None,
        }
    }

    pub fn surface(&self) -> &'static str {
        self.source.surface()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    pub fn baseline(&self) -> &S::Draft {
        &self.baseline
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    /// Writes left over from a partially applied commit.
    pub fn pending_writes(&self) -> usize {
        self.pending.as_ref().map_or(0, |p| p.remaining.len())
    }

    pub fn view(&self) -> DraftView<'_, S::Draft> {
        DraftView {
            surface: self.surface(),
            phase: self.phase,
            dirty: self.is_dirty(),
            pending_writes: self.pending_writes(),
            draft: &self.draft,
        }
    }

    /// Fetch the remote state into both baseline and draft.
    ///
    /// On failure the draft keeps whatever it held before (the default value
    /// on first load) and nothing is retried.
    pub async fn load(&mut self, store: &dyn DocumentStore) -> Result<&S::Draft, DraftError> {
        let previous = self.phase;
        self.phase = Phase::Loading;
        self.refetch(store, previous).await
    }

    /// Apply a local, copy-on-write mutation. Never contacts the store.
    pub fn mutate<F>(&mut self, f: F) -> &S::Draft
    where
        F: FnOnce(&mut S::Draft),
    {
        let mut next = self.draft.clone();
        f(&mut next);
        self.source.normalize(&mut next);
        self.draft = next;
        self.refresh_phase();
        &self.draft
    }

    /// Apply field-path edits. On any invalid edit the draft is unchanged.
    pub fn apply_edits(&mut self, edits: &[FieldEdit]) -> Result<&S::Draft, DraftError> {
        let surface = self.surface();
        let next = apply_edits(&self.draft, edits).map_err(|e| DraftError::Validation {
            surface,
            reason: validation_reason(e),
        })?;
        Ok(self.mutate(|draft| *draft = next))
    }

    /// Validate and persist the draft.
    pub async fn commit(&mut self, store: &dyn DocumentStore) -> Result<CommitReport, DraftError> {
        let surface = self.surface();
        if !self.loaded {
            return Err(DraftError::NotLoaded { surface });
        }

        self.source
            .validate(&self.draft)
            .map_err(|e| DraftError::Validation {
                surface,
                reason: validation_reason(e),
            })?;

        let (ops, resumed) = match self.pending.take() {
            Some(pending) if pending.draft == self.draft => (pending.remaining, true),
            _ => (self.source.plan(&self.baseline, &self.draft), false),
        };

        if ops.is_empty() {
            self.phase = Phase::Viewing;
            return Ok(CommitReport {
                surface,
                written: 0,
                resumed,
            });
        }

        self.phase = Phase::Committing;
        match store.apply_batch(&ops).await {
            Ok(()) => {
                tracing::info!(surface, writes = ops.len(), resumed, "Draft committed");
                self.baseline = self.draft.clone();
                self.phase = Phase::Viewing;
                Ok(CommitReport {
                    surface,
                    written: ops.len(),
                    resumed,
                })
            }
            Err(BatchError {
                applied,
                total,
                source,
            }) => {
                tracing::error!(surface, applied, total, error = %source, "Draft commit failed");
                self.source
                    .settle(&mut self.baseline, &self.draft, &ops[..applied]);
                self.pending = Some(PendingCommit {
                    draft: self.draft.clone(),
                    remaining: ops[applied..].to_vec(),
                });
                self.phase = Phase::Editing;
                Err(DraftError::Commit {
                    surface,
                    written: applied,
                    total,
                    source,
                })
            }
        }
    }

    /// Throw away local edits by reloading the remote state.
    pub async fn discard(&mut self, store: &dyn DocumentStore) -> Result<&S::Draft, DraftError> {
        let previous = self.phase;
        self.phase = Phase::Discarding;
        self.refetch(store, previous).await
    }

    async fn refetch(
        &mut self,
        store: &dyn DocumentStore,
        previous: Phase,
    ) -> Result<&S::Draft, DraftError> {
        let surface = self.surface();
        match self.fetch(store).await {
            Ok(mut remote) => {
                // Normalize up front so untouched records never show up as changed.
                self.source.normalize(&mut remote);
                self.baseline = remote.clone();
                self.draft = remote;
                self.pending = None;
                self.loaded = true;
                self.phase = Phase::Viewing;
                Ok(&self.draft)
            }
            Err(source) => {
                tracing::error!(surface, error = %source, "Failed to load draft");
                self.phase = if self.loaded { previous } else { Phase::Loading };
                Err(DraftError::Fetch { surface, source })
            }
        }
    }

    async fn fetch(&self, store: &dyn DocumentStore) -> Result<S::Draft, StoreError> {
        let snapshot = match self.source.read_spec() {
            ReadSpec::Document { collection, id } => {
                Snapshot::Document(store.get(collection, id).await?)
            }
            ReadSpec::Collection {
                collection,
                order_by,
            } => Snapshot::Collection(store.list(collection, order_by).await?),
        };
        self.source.decode(snapshot)
    }

    fn refresh_phase(&mut self) {
        if matches!(self.phase, Phase::Viewing | Phase::Editing) {
            self.phase = if self.is_dirty() {
                Phase::Editing
            } else {
                Phase::Viewing
            };
        }
    }
}

fn validation_reason(err: CoreError) -> String {
    match err {
        CoreError::Validation(reason) => reason,
        other => other.to_string(),
    }
}
