//! Handler for `POST /api/upload`.

use axum::extract::{Multipart, State};
use axum::Json;
use kitchen_cloud::UploadFile;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub secure_url: String,
}

/// POST /api/upload
///
/// Forward the `file` field to the media host and return its HTTPS URL. The
/// admin writes the URL into a draft field afterwards.
pub async fn upload(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadResponse>>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = file.ok_or_else(|| {
        AppError::BadRequest(format!("Multipart field '{FILE_FIELD}' is missing"))
    })?;
    tracing::info!(
        admin = %admin.email,
        file = %file.file_name,
        bytes = file.bytes.len(),
        "Uploading image"
    );

    let secure_url = state.media.upload(file).await?;
    Ok(Json(DataResponse {
        data: UploadResponse { secure_url },
    }))
}
