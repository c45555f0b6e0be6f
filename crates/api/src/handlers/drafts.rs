//! Draft-Edit-Commit endpoints shared by every admin editing surface.
//!
//! ```text
//! GET   /api/admin/drafts/{surface}          load on first use, then view
//! PATCH /api/admin/drafts/{surface}          apply field-path edits
//! POST  /api/admin/drafts/{surface}/commit   save the draft
//! POST  /api/admin/drafts/{surface}/discard  reload, dropping local edits
//! ```

use axum::extract::{Path, State};
use axum::Json;
use kitchen_core::draft::{CommitReport, FieldEdit};
use kitchen_events::ContentEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drafts::{DraftGuard, Surface};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub edits: Vec<FieldEdit>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub commit: CommitReport,
    pub draft: Value,
}

fn acquire(state: &AppState, admin: &str, surface: &str) -> AppResult<(Surface, DraftGuard)> {
    let surface: Surface = surface.parse()?;
    let session = state.drafts.acquire(admin, surface)?;
    Ok((surface, session))
}

async fn ensure_loaded(state: &AppState, session: &mut DraftGuard) -> AppResult<()> {
    if !session.is_loaded() {
        session.load(state.store.as_ref()).await?;
    }
    Ok(())
}

/// GET /api/admin/drafts/{surface}
pub async fn get_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(surface): Path<String>,
) -> AppResult<Json<DataResponse<Value>>> {
    let (_, mut session) = acquire(&state, &admin.email, &surface)?;
    ensure_loaded(&state, &mut session).await?;
    Ok(Json(DataResponse {
        data: session.view()?,
    }))
}

/// PATCH /api/admin/drafts/{surface}
///
/// Edits are all-or-nothing: one bad edit leaves the draft untouched.
pub async fn edit_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(surface): Path<String>,
    Json(input): Json<EditRequest>,
) -> AppResult<Json<DataResponse<Value>>> {
    let (surface, mut session) = acquire(&state, &admin.email, &surface)?;
    ensure_loaded(&state, &mut session).await?;
    session.apply_edits(&input.edits)?;
    tracing::debug!(admin = %admin.email, %surface, edits = input.edits.len(), "Draft edited");
    Ok(Json(DataResponse {
        data: session.view()?,
    }))
}

/// POST /api/admin/drafts/{surface}/commit
pub async fn commit_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(surface): Path<String>,
) -> AppResult<Json<DataResponse<CommitResponse>>> {
    let (surface, mut session) = acquire(&state, &admin.email, &surface)?;
    let report = session.commit(state.store.as_ref()).await?;

    if report.written > 0 {
        state.event_bus.publish(
            ContentEvent::committed(surface.as_str(), report.written).with_actor(admin.email),
        );
    }

    Ok(Json(DataResponse {
        data: CommitResponse {
            commit: report,
            draft: session.view()?,
        },
    }))
}

/// POST /api/admin/drafts/{surface}/discard
pub async fn discard_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(surface): Path<String>,
) -> AppResult<Json<DataResponse<Value>>> {
    let (surface, mut session) = acquire(&state, &admin.email, &surface)?;
    session.discard(state.store.as_ref()).await?;
    tracing::info!(admin = %admin.email, %surface, "Draft discarded");
    Ok(Json(DataResponse {
        data: session.view()?,
    }))
}
