use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{GameStore, StoreError, StoreResult, TIMER_DURATION_KEY};
use crate::{
    db::queries,
    models::{GameResult, GameSetting, LeaderboardEntry, NewGameResult, NewWord, Player, Word},
};

pub struct PgStore {
    pool: PgPool,
    default_timer_duration: u32,
}

impl PgStore {
    pub fn new(pool: PgPool, default_timer_duration: u32) -> Self {
        Self {
            pool,
            default_timer_duration,
        }
    }
}

#[async_trait]
impl GameStore for PgStore {
    async fn list_words(&self) -> StoreResult<Vec<Word>> {
        Ok(queries::list_words(&self.pool).await?)
    }

    async fn create_word(&self, word: NewWord) -> StoreResult<Word> {
        Ok(queries::create_word(&self.pool, &word).await?)
    }

    async fn update_word(&self, id: i32, word: NewWord) -> StoreResult<Word> {
        queries::update_word(&self.pool, id, &word)
            .await?
            .ok_or(StoreError::WordNotFound(id))
    }

    async fn delete_word(&self, id: i32) -> StoreResult<()> {
        if queries::delete_word(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::WordNotFound(id))
        }
    }

    async fn settings(&self) -> StoreResult<BTreeMap<String, String>> {
        if queries::get_setting(&self.pool, TIMER_DURATION_KEY)
            .await?
            .is_none()
        {
            queries::upsert_setting(
                &self.pool,
                TIMER_DURATION_KEY,
                &self.default_timer_duration.to_string(),
            )
            .await?;
            tracing::info!(
                "Initialised {} to {}s",
                TIMER_DURATION_KEY,
                self.default_timer_duration
            );
        }

        Ok(queries::get_all_settings(&self.pool)
            .await?
            .into_iter()
            .map(|s| (s.setting_key, s.setting_value))
            .collect())
    }

    async fn set_setting(&self, key: &str, value: &str) -> StoreResult<GameSetting> {
        Ok(queries::upsert_setting(&self.pool, key, value).await?)
    }

    async fn register_player(&self, employee_id: &str, name: &str) -> StoreResult<Player> {
        if queries::has_completed_game(&self.pool, employee_id).await? {
            return Err(StoreError::AlreadyCompleted(employee_id.to_string()));
        }

        Ok(queries::get_or_create_player(&self.pool, employee_id, name).await?)
    }

    async fn has_completed(&self, employee_id: &str) -> StoreResult<bool> {
        Ok(queries::has_completed_game(&self.pool, employee_id).await?)
    }

    async fn submit_result(&self, result: NewGameResult) -> StoreResult<GameResult> {
        if queries::get_player(&self.pool, result.player_id)
            .await?
            .is_none()
        {
            return Err(StoreError::PlayerNotFound(result.player_id));
        }

        queries::create_game_result(&self.pool, &result)
            .await?
            .ok_or(StoreError::DuplicateResult(result.player_id))
    }

    async fn leaderboard(&self) -> StoreResult<Vec<LeaderboardEntry>> {
        Ok(queries::get_leaderboard(&self.pool).await?)
    }
}
