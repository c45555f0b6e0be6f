//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Shared as `Arc<EventBus>`; the theme stream and the event logger are
//! its subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub const THEME_CHANGED: &str = "theme.changed";
pub const CONTENT_COMMITTED: &str = "content.committed";

// ---------------------------------------------------------------------------
// ContentEvent
// ---------------------------------------------------------------------------

/// Something changed in the committed site content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEvent {
    /// Dot-separated event name, e.g. `"theme.changed"`.
    pub event_type: String,

    /// Editing surface the change came from (`"menu"`, `"theme"`, ...).
    pub surface: Option<String>,

    /// Admin who made the change.
    pub actor: Option<String>,

    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl ContentEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            surface: None,
            actor: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// `theme.changed` carrying `{"theme": ...}`.
    pub fn theme_changed(theme: &str) -> Self {
        Self::new(THEME_CHANGED)
            .with_surface("theme")
            .with_payload(serde_json::json!({ "theme": theme }))
    }

    /// `content.committed` carrying the number of writes.
    pub fn committed(surface: &str, written: usize) -> Self {
        Self::new(CONTENT_COMMITTED)
            .with_surface(surface)
            .with_payload(serde_json::json!({ "written": written }))
    }

    pub fn with_surface(mut self, surface: impl Into<String>) -> Self {
        self.surface = Some(surface.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<ContentEvent>,
}

impl EventBus {
    /// When the buffer is full the oldest events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: ContentEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContentEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
