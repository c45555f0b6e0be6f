//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use kitchen_api::error::AppError;
use kitchen_cloud::MediaError;
use kitchen_core::draft::DraftError;
use kitchen_core::error::CoreError;
use kitchen_core::store::StoreError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Editing surface",
        id: "navbar".into(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Editing surface with id navbar not found");
}

#[tokio::test]
async fn fetch_failure_returns_502_naming_the_surface() {
    let err = AppError::Draft(DraftError::Fetch {
        surface: "menu",
        source: unavailable(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "FETCH_FAILED");
    assert_eq!(json["message"], "Failed to load menu. Please try again.");
}

#[tokio::test]
async fn commit_failure_reports_progress() {
    let err = AppError::Draft(DraftError::Commit {
        surface: "services",
        written: 1,
        total: 3,
        source: unavailable(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "COMMIT_FAILED");
    assert_eq!(json["message"], "Failed to save services. Please try again.");
    assert_eq!(json["written"], 1);
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn validation_failure_returns_400_with_reason() {
    let err = AppError::Draft(DraftError::Validation {
        surface: "products",
        reason: "Product must have an image".into(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Product must have an image");
}

#[tokio::test]
async fn not_loaded_returns_409() {
    let err = AppError::Draft(DraftError::NotLoaded { surface: "hero" });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn upload_failure_is_sanitized() {
    let err = AppError::Media(MediaError::HttpStatus {
        status: 401,
        body: "Invalid api_key".into(),
    });
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPLOAD_FAILED");
    assert!(!json["message"].as_str().unwrap().contains("api_key"));
}

#[tokio::test]
async fn empty_upload_is_a_validation_error() {
    let (status, json) = error_to_response(AppError::Media(MediaError::EmptyFile)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let err = AppError::InternalError("secret stack trace".into());
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("missing field".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["message"], "missing field");
}
