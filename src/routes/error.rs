use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// JSON error body returned by every API route: `{ "error": "..." }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Set when an employee ID has used up its single attempt
    pub already_completed: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            already_completed: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::AlreadyCompleted(_) | StoreError::DuplicateResult(_) => StatusCode::CONFLICT,
            StoreError::PlayerNotFound(_) | StoreError::WordNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidSetting { .. } => StatusCode::BAD_REQUEST,
            StoreError::Database(e) => {
                tracing::error!("Database error: {}", e);
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };
        Self {
            already_completed: matches!(err, StoreError::AlreadyCompleted(_)),
            ..Self::new(status, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });
        if self.already_completed {
            body["alreadyCompleted"] = json!(true);
        }
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
