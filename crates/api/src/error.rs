use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kitchen_cloud::MediaError;
use kitchen_core::draft::DraftError;
use kitchen_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent `{ "code", "message" }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Load, save or validation failure of a content surface.
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Commit failures tell the admin how far the save got.
        let mut progress = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Draft lifecycle ---
            AppError::Draft(err) => match err {
                DraftError::Fetch { surface, source } => {
                    tracing::error!(surface, error = %source, "Fetch failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "FETCH_FAILED",
                        format!("Failed to load {surface}. Please try again."),
                    )
                }
                DraftError::Commit {
                    surface,
                    written,
                    total,
                    source,
                } => {
                    tracing::error!(surface, written, total, error = %source, "Commit failed");
                    progress = Some((*written, *total));
                    (
                        StatusCode::BAD_GATEWAY,
                        "COMMIT_FAILED",
                        format!("Failed to save {surface}. Please try again."),
                    )
                }
                DraftError::Validation { reason, .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
                }
                DraftError::NotLoaded { .. } => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                }
            },

            // --- Media host ---
            AppError::Media(MediaError::EmptyFile) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Upload is empty".to_string(),
            ),
            AppError::Media(err) => {
                tracing::error!(error = %err, "Upload failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPLOAD_FAILED",
                    "Failed to upload image. Please try again.".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "code": code,
            "message": message,
        });
        if let Some((written, total)) = progress {
            body["written"] = json!(written);
            body["total"] = json!(total);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
