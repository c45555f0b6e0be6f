//! Per-admin draft sessions.
//!
//! Every admin gets one [`DraftController`] per editing surface, created on
//! first use and kept in memory until the process exits. Each session sits
//! behind its own async mutex; handlers use `try_lock` so an operation on a
//! busy draft (a commit still in flight) is rejected instead of queued.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use kitchen_core::content::{
    HeroSource, MenuSource, PopupsSource, ProductsSource, ServicesSource, SocialSource,
    TiffinSource, TrendingSource,
};
use kitchen_core::draft::{CommitReport, DraftController, DraftError, DraftSource, FieldEdit};
use kitchen_core::error::CoreError;
use kitchen_core::store::DocumentStore;
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// ---------------------------------------------------------------------------
// Surfaces
// ---------------------------------------------------------------------------

/// Admin editing surfaces addressable as `/api/admin/drafts/{surface}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Menu,
    Services,
    Hero,
    Social,
    Trending,
    Tiffin,
    Popups,
    Products,
}

impl Surface {
    pub const ALL: [Surface; 8] = [
        Surface::Menu,
        Surface::Services,
        Surface::Hero,
        Surface::Social,
        Surface::Trending,
        Surface::Tiffin,
        Surface::Popups,
        Surface::Products,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Menu => "menu",
            Surface::Services => "services",
            Surface::Hero => "hero",
            Surface::Social => "social",
            Surface::Trending => "trending",
            Surface::Tiffin => "tiffin",
            Surface::Popups => "popups",
            Surface::Products => "products",
        }
    }

    fn new_session(self) -> Box<dyn DraftSession> {
        match self {
            Surface::Menu => Box::new(DraftController::new(MenuSource::new())),
            Surface::Services => Box::new(DraftController::new(ServicesSource::new())),
            Surface::Hero => Box::new(DraftController::new(HeroSource::new())),
            Surface::Social => Box::new(DraftController::new(SocialSource::new())),
            Surface::Trending => Box::new(DraftController::new(TrendingSource::new())),
            Surface::Tiffin => Box::new(DraftController::new(TiffinSource::new())),
            Surface::Popups => Box::new(DraftController::new(PopupsSource::new())),
            Surface::Products => Box::new(DraftController::new(ProductsSource::new())),
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Surface::ALL
            .into_iter()
            .find(|surface| surface.as_str() == s)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Editing surface",
                id: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Type-erased controller
// ---------------------------------------------------------------------------

/// Object-safe view of a [`DraftController`] with JSON in and out, so one
/// set of handlers serves every surface.
#[async_trait]
pub trait DraftSession: Send {
    fn is_loaded(&self) -> bool;

    /// `{surface, phase, dirty, pending_writes, draft}`.
    fn view(&self) -> Result<Value, CoreError>;

    async fn load(&mut self, store: &dyn DocumentStore) -> Result<(), DraftError>;

    fn apply_edits(&mut self, edits: &[FieldEdit]) -> Result<(), DraftError>;

    async fn commit(&mut self, store: &dyn DocumentStore) -> Result<CommitReport, DraftError>;

    async fn discard(&mut self, store: &dyn DocumentStore) -> Result<(), DraftError>;
}

#[async_trait]
impl<S: DraftSource> DraftSession for DraftController<S> {
    fn is_loaded(&self) -> bool {
        DraftController::is_loaded(self)
    }

    fn view(&self) -> Result<Value, CoreError> {
        serde_json::to_value(DraftController::view(self))
            .map_err(|e| CoreError::Internal(format!("Draft is not serializable: {e}")))
    }

    async fn load(&mut self, store: &dyn DocumentStore) -> Result<(), DraftError> {
        DraftController::load(self, store).await.map(|_| ())
    }

    fn apply_edits(&mut self, edits: &[FieldEdit]) -> Result<(), DraftError> {
        DraftController::apply_edits(self, edits).map(|_| ())
    }

    async fn commit(&mut self, store: &dyn DocumentStore) -> Result<CommitReport, DraftError> {
        DraftController::commit(self, store).await
    }

    async fn discard(&mut self, store: &dyn DocumentStore) -> Result<(), DraftError> {
        DraftController::discard(self, store).await.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type Slot = Arc<AsyncMutex<Box<dyn DraftSession>>>;

/// Locked access to one admin's draft of one surface.
pub type DraftGuard = OwnedMutexGuard<Box<dyn DraftSession>>;

/// All draft sessions, keyed by admin and surface.
///
/// Thread-safe; designed to be wrapped in `Arc` and shared through
/// [`AppState`](crate::state::AppState).
#[derive(Default)]
pub struct DraftRegistry {
    slots: Mutex<HashMap<(String, Surface), Slot>>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for `(admin, surface)`, creating it on first use.
    ///
    /// Fails with [`CoreError::Conflict`] when another request holds it.
    pub fn acquire(&self, admin: &str, surface: Surface) -> Result<DraftGuard, CoreError> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                slots
                    .entry((admin.to_string(), surface))
                    .or_insert_with(|| Arc::new(AsyncMutex::new(surface.new_session()))),
            )
        };
        slot.try_lock_owned().map_err(|_| {
            tracing::debug!(admin, %surface, "Draft busy, rejecting request");
            CoreError::Conflict(format!(
                "Another operation on {surface} is in progress. Please wait for it to finish."
            ))
        })
    }

    /// Number of sessions created so far.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
