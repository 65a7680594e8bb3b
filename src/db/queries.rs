use sqlx::{PgPool, Result};

use crate::models::{
    GameResult, GameSetting, LeaderboardEntry, NewGameResult, NewWord, Player, Word,
};

// Word queries
pub async fn list_words(pool: &PgPool) -> Result<Vec<Word>> {
    sqlx::query_as::<_, Word>("SELECT * FROM words ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn create_word(pool: &PgPool, word: &NewWord) -> Result<Word> {
    sqlx::query_as::<_, Word>(
        r#"
        INSERT INTO words (word, clue, direction)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&word.word)
    .bind(&word.clue)
    .bind(word.direction)
    .fetch_one(pool)
    .await
}

pub async fn update_word(pool: &PgPool, id: i32, word: &NewWord) -> Result<Option<Word>> {
    sqlx::query_as::<_, Word>(
        r#"
        UPDATE words
        SET word = $1,
            clue = $2,
            direction = $3
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&word.word)
    .bind(&word.clue)
    .bind(word.direction)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns `true` if a row was deleted
pub async fn delete_word(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM words WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// Settings queries
pub async fn get_all_settings(pool: &PgPool) -> Result<Vec<GameSetting>> {
    sqlx::query_as::<_, GameSetting>("SELECT * FROM game_settings ORDER BY setting_key")
        .fetch_all(pool)
        .await
}

pub async fn get_setting(pool: &PgPool, key: &str) -> Result<Option<GameSetting>> {
    sqlx::query_as::<_, GameSetting>("SELECT * FROM game_settings WHERE setting_key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await
}

pub async fn upsert_setting(pool: &PgPool, key: &str, value: &str) -> Result<GameSetting> {
    sqlx::query_as::<_, GameSetting>(
        r#"
        INSERT INTO game_settings (setting_key, setting_value)
        VALUES ($1, $2)
        ON CONFLICT (setting_key)
        DO UPDATE SET
            setting_value = $2,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await
}

// Player queries
pub async fn get_player(pool: &PgPool, player_id: i32) -> Result<Option<Player>> {
    sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
        .bind(player_id)
        .fetch_optional(pool)
        .await
}

/// Insert a player, or return the existing row for the same employee ID
pub async fn get_or_create_player(pool: &PgPool, employee_id: &str, name: &str) -> Result<Player> {
    sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO players (employee_id, name)
        VALUES ($1, $2)
        ON CONFLICT (employee_id)
        DO UPDATE SET employee_id = EXCLUDED.employee_id
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn has_completed_game(pool: &PgPool, employee_id: &str) -> Result<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM game_results r
            INNER JOIN players p ON p.id = r.player_id
            WHERE p.employee_id = $1
        )
        "#,
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
}

// Game result queries
/// Insert a game result. Returns `None` when the player already has one.
pub async fn create_game_result(pool: &PgPool, result: &NewGameResult) -> Result<Option<GameResult>> {
    sqlx::query_as::<_, GameResult>(
        r#"
        INSERT INTO game_results (player_id, time_taken, words_found, total_words, completed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (player_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(result.player_id)
    .bind(result.time_taken)
    .bind(result.words_found)
    .bind(result.total_words)
    .bind(result.completed)
    .fetch_optional(pool)
    .await
}

/// Ranked results: full completions first, then most words found, then fastest
pub async fn get_leaderboard(pool: &PgPool) -> Result<Vec<LeaderboardEntry>> {
    sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            r.id,
            p.employee_id,
            p.name,
            r.time_taken,
            r.words_found,
            r.total_words,
            r.completed,
            r.completed_at,
            ROW_NUMBER() OVER (
                ORDER BY r.completed DESC, r.words_found DESC, r.time_taken ASC, r.id ASC
            ) AS rank
        FROM game_results r
        INNER JOIN players p ON p.id = r.player_id
        ORDER BY rank
        "#,
    )
    .fetch_all(pool)
    .await
}
