//! Content event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ContentEvent`]: the event envelope (`theme.changed`,
//!   `content.committed`).
//! - [`EventLogger`]: background task writing every event to the log.

pub mod bus;
pub mod logger;

pub use bus::{ContentEvent, EventBus};
pub use logger::EventLogger;
