use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::{auth, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: AdminInfo,
    /// JWT for the admin-only word and settings routes
    pub token: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let security = &state.config.security;
    let username_ok = auth::credentials_match(&security.admin_username, &payload.username);
    let password_ok = auth::credentials_match(&security.admin_password, &payload.password);
    if !(username_ok && password_ok) {
        tracing::warn!("Failed admin login for {}", payload.username);
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    let token = auth::generate_token(&payload.username, &security.jwt_secret).map_err(|e| {
        tracing::error!("Failed to generate admin token: {}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to login")
    })?;

    tracing::info!("Admin {} logged in", payload.username);
    Ok(Json(LoginResponse {
        success: true,
        admin: AdminInfo {
            username: payload.username,
        },
        token,
    }))
}
