use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

use super::error::{ApiError, ApiResult};
use crate::{
    auth::AdminUser,
    models::GameSetting,
    store::{parse_timer_duration, TIMER_DURATION_KEY},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub setting: GameSetting,
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<SettingsResponse> {
    let settings = state.store.settings().await?;
    Ok(Json(SettingsResponse { settings }))
}

pub async fn update_setting(
    admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSettingRequest>,
) -> ApiResult<SettingResponse> {
    let key = payload.key.trim();
    let value = payload.value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(ApiError::bad_request("Key and value are required"));
    }
    if key == TIMER_DURATION_KEY && parse_timer_duration(value)? == 0 {
        return Err(ApiError::bad_request("Timer duration must be at least one second"));
    }

    let setting = state.store.set_setting(key, value).await?;
    tracing::info!("Admin {} set {} = {}", admin.username, key, value);
    Ok(Json(SettingResponse { setting }))
}
