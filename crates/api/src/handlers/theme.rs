//! Site theme: read, change, and follow changes live.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use kitchen_core::content::{read_document, SiteTheme, ThemeSetting};
use kitchen_core::draft::{DraftController, DraftError, SingleDocument};
use kitchen_events::bus::THEME_CHANGED;
use kitchen_events::ContentEvent;
use serde::Deserialize;
use serde_json::json;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub theme: String,
}

async fn current_theme(state: &AppState) -> AppResult<ThemeSetting> {
    read_document::<ThemeSetting>(state.store.as_ref())
        .await
        .map(Option::unwrap_or_default)
        .map_err(|source| {
            AppError::Draft(DraftError::Fetch {
                surface: "theme",
                source,
            })
        })
}

/// GET /api/settings/theme
pub async fn get_theme(State(state): State<AppState>) -> AppResult<Json<DataResponse<ThemeSetting>>> {
    Ok(Json(DataResponse {
        data: current_theme(&state).await?,
    }))
}

/// PUT /api/settings/theme
///
/// Saves the theme and notifies every open theme stream.
pub async fn update_theme(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ThemeUpdate>,
) -> AppResult<Json<DataResponse<ThemeSetting>>> {
    let theme: SiteTheme = input.theme.parse()?;

    let store = state.store.as_ref();
    let mut setting = DraftController::new(SingleDocument::<ThemeSetting>::new());
    setting.load(store).await?;
    setting.mutate(|s| s.theme = theme);
    let report = setting.commit(store).await?;

    if report.written > 0 {
        tracing::info!(admin = %admin.email, %theme, "Theme changed");
        state
            .event_bus
            .publish(ContentEvent::theme_changed(theme.as_str()).with_actor(admin.email));
    }

    Ok(Json(DataResponse {
        data: *setting.draft(),
    }))
}

/// GET /api/settings/theme/stream
///
/// Server-sent `theme` events: the current theme first, then every change
/// until the server shuts down.
pub async fn theme_stream(
    State(state): State<AppState>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    // Subscribe before reading so a change in between is not missed.
    let receiver = state.event_bus.subscribe();
    let current = current_theme(&state).await?;

    let initial = futures::stream::once(async move { theme_event(current.theme.as_str()) });
    let changes = BroadcastStream::new(receiver).filter_map(|event| async move {
        match event {
            Ok(event) if event.event_type == THEME_CHANGED => event
                .payload
                .get("theme")
                .and_then(|t| t.as_str())
                .map(theme_event),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Theme stream lagged");
                None
            }
        }
    });

    // Open streams would otherwise hold graceful shutdown forever.
    let events = initial
        .chain(changes)
        .take_until(state.shutdown.clone().cancelled_owned());
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn theme_event(theme: &str) -> Result<Event, axum::Error> {
    Event::default().event("theme").json_data(json!({ "theme": theme }))
}
