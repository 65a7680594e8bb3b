use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::{models::Player, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub employee_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub player: Player,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub has_completed: bool,
}

/// Register (or look up) a player. Each employee ID gets one completed attempt.
pub async fn register_player(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<PlayerResponse> {
    let employee_id = payload.employee_id.trim();
    let name = payload.name.trim();
    if employee_id.is_empty() || name.is_empty() {
        return Err(ApiError::bad_request("Employee ID and name are required"));
    }

    let player = state.store.register_player(employee_id, name).await?;
    tracing::info!("Registered player {} ({})", player.name, player.employee_id);
    Ok(Json(PlayerResponse { player }))
}

pub async fn check_player(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> ApiResult<CheckResponse> {
    let has_completed = state.store.has_completed(&employee_id).await?;
    Ok(Json(CheckResponse { has_completed }))
}
