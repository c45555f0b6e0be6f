//! Handler for `POST /api/login`.

use axum::extract::State;
use axum::Json;
use kitchen_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::auth::ROLE_ADMIN;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/login
///
/// Authenticate the admin with email + password and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let admin = &state.config.admin;
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    if !input.email.trim().eq_ignore_ascii_case(&admin.email) {
        tracing::warn!(email = %input.email, "Login attempt for unknown account");
        return Err(invalid());
    }

    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(email = %admin.email, "Login failed: wrong password");
        return Err(invalid());
    }

    let access_token = generate_access_token(&admin.email, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    tracing::info!(email = %admin.email, "Admin logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            expires_in: state.config.jwt.expires_in_secs(),
        },
    }))
}
