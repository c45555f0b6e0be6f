//! Background task that records every [`ContentEvent`] in the log.

use tokio::sync::broadcast;

use crate::bus::ContentEvent;

pub struct EventLogger;

impl EventLogger {
    /// Run until the [`EventBus`](crate::bus::EventBus) is dropped. Returns
    /// the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<ContentEvent>) -> usize {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = %event.event_type,
                        surface = event.surface.as_deref().unwrap_or("-"),
                        actor = event.actor.as_deref().unwrap_or("-"),
                        payload = %event.payload,
                        "Content event"
                    );
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
        logged
    }
}
