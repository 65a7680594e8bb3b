use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::{
    models::{GameResult, LeaderboardEntry, NewGameResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: GameResult,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Record a result for a game played outside the WebSocket session
pub async fn submit_result(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewGameResult>,
) -> ApiResult<ResultResponse> {
    validate_result(&payload)?;
    let result = state.store.submit_result(payload).await?;
    tracing::info!(
        "Recorded result for player {}: {}/{} words in {}s",
        result.player_id,
        result.words_found,
        result.total_words,
        result.time_taken
    );
    Ok(Json(ResultResponse { result }))
}

pub async fn leaderboard(State(state): State<Arc<AppState>>) -> ApiResult<LeaderboardResponse> {
    let leaderboard = state.store.leaderboard().await?;
    Ok(Json(LeaderboardResponse { leaderboard }))
}

fn validate_result(result: &NewGameResult) -> Result<(), ApiError> {
    if result.time_taken < 0 || result.words_found < 0 || result.total_words < 0 {
        return Err(ApiError::bad_request("Counts and times cannot be negative"));
    }
    if result.words_found > result.total_words {
        return Err(ApiError::bad_request("Cannot find more words than the puzzle holds"));
    }
    Ok(())
}
