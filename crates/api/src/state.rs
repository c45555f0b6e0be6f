use std::sync::Arc;

use kitchen_cloud::MediaHost;
use kitchen_core::search::SmartSearch;
use kitchen_core::store::DocumentStore;
use kitchen_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::drafts::DraftRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Committed site content.
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<ServerConfig>,
    /// Theme changes and commit notifications.
    pub event_bus: Arc<EventBus>,
    /// Image host behind `/api/upload`.
    pub media: Arc<dyn MediaHost>,
    /// Product search-term expansion.
    pub search: Arc<SmartSearch>,
    /// In-progress admin drafts.
    pub drafts: Arc<DraftRegistry>,
    /// Cancelled once shutdown starts; ends long-lived responses.
    pub shutdown: CancellationToken,
}
