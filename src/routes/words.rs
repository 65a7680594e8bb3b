use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::{
    auth::AdminUser,
    models::{NewWord, Word},
    utils::letters::normalize_word,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct WordsResponse {
    pub words: Vec<Word>,
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub word: Word,
}

/// Puzzle words as entered by admins; the game seeds the grid from these
pub async fn list_words(State(state): State<Arc<AppState>>) -> ApiResult<WordsResponse> {
    let words = state.store.list_words().await?;
    Ok(Json(WordsResponse { words }))
}

pub async fn create_word(
    admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWord>,
) -> ApiResult<WordResponse> {
    let payload = validate_word(payload)?;
    let word = state.store.create_word(payload).await?;
    tracing::info!("Admin {} added word {} ({})", admin.username, word.word, word.id);
    Ok(Json(WordResponse { word }))
}

pub async fn update_word(
    admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<NewWord>,
) -> ApiResult<WordResponse> {
    let payload = validate_word(payload)?;
    let word = state.store.update_word(id, payload).await?;
    tracing::info!("Admin {} updated word {} ({})", admin.username, word.word, word.id);
    Ok(Json(WordResponse { word }))
}

pub async fn delete_word(
    admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    state.store.delete_word(id).await?;
    tracing::info!("Admin {} deleted word {}", admin.username, id);
    Ok(Json(json!({ "success": true })))
}

/// Puzzle words must be letters only; they are stored uppercased
fn validate_word(payload: NewWord) -> Result<NewWord, ApiError> {
    let word = normalize_word(&payload.word);
    if word.is_empty() || payload.clue.trim().is_empty() {
        return Err(ApiError::bad_request("Word and clue are required"));
    }
    if !word.chars().all(|c| c.is_alphabetic()) {
        return Err(ApiError::bad_request("Word may only contain letters"));
    }

    Ok(NewWord {
        word,
        clue: payload.clue.trim().to_string(),
        direction: payload.direction,
    })
}
