//! Persistence behind the game: words, settings, players, results.
//!
//! The session engine only ever talks to a [`GameStore`]; the Postgres and
//! in-memory backends implement the same rules (one result per player, one
//! completed attempt per employee ID).

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    GameResult, GameSetting, LeaderboardEntry, NewGameResult, NewWord, Player, Word, WordDirection,
};

/// Settings key holding the play time limit in seconds
pub const TIMER_DURATION_KEY: &str = "timerDuration";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee ID {0} has already completed the game")]
    AlreadyCompleted(String),
    #[error("a game result already exists for player {0}")]
    DuplicateResult(i32),
    #[error("player {0} not found")]
    PlayerNotFound(i32),
    #[error("word {0} not found")]
    WordNotFound(i32),
    #[error("invalid value for setting {key}: {value}")]
    InvalidSetting { key: String, value: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// All puzzle words, oldest first
    async fn list_words(&self) -> StoreResult<Vec<Word>>;

    async fn create_word(&self, word: NewWord) -> StoreResult<Word>;

    async fn update_word(&self, id: i32, word: NewWord) -> StoreResult<Word>;

    async fn delete_word(&self, id: i32) -> StoreResult<()>;

    /// Every stored setting, with the timer default filled in on first read
    async fn settings(&self) -> StoreResult<BTreeMap<String, String>>;

    async fn set_setting(&self, key: &str, value: &str) -> StoreResult<GameSetting>;

    /// Find or create the player for `employee_id`, unless that ID already has a result
    async fn register_player(&self, employee_id: &str, name: &str) -> StoreResult<Player>;

    async fn has_completed(&self, employee_id: &str) -> StoreResult<bool>;

    /// Record a finished game. A player can only ever have one result.
    async fn submit_result(&self, result: NewGameResult) -> StoreResult<GameResult>;

    async fn leaderboard(&self) -> StoreResult<Vec<LeaderboardEntry>>;

    /// Play time limit in seconds
    async fn timer_duration(&self) -> StoreResult<u32> {
        let settings = self.settings().await?;
        let value = settings
            .get(TIMER_DURATION_KEY)
            .map(String::as_str)
            .unwrap_or_default();
        parse_timer_duration(value)
    }
}

pub fn parse_timer_duration(value: &str) -> StoreResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| StoreError::InvalidSetting {
            key: TIMER_DURATION_KEY.to_string(),
            value: value.to_string(),
        })
}

/// Words loaded into an empty store on first start
pub const DEFAULT_WORDS: &[(&str, &str, WordDirection)] = &[
    ("QUALITY", "Standard of excellence", WordDirection::LeftRight),
    ("TEAMWORK", "Collaborative effort", WordDirection::LeftRight),
    ("EXCELLENCE", "Outstanding quality", WordDirection::LeftRight),
    ("PROCESS", "Series of actions", WordDirection::TopBottom),
    ("IMPROVEMENT", "Making something better", WordDirection::TopBottom),
    ("SAFETY", "Protection from harm", WordDirection::LeftRight),
    ("STANDARD", "Established norm", WordDirection::TopBottom),
    ("FEEDBACK", "Constructive response", WordDirection::LeftRight),
    ("AUDIT", "Official inspection", WordDirection::TopBottom),
    ("CUSTOMER", "Person who buys", WordDirection::LeftRight),
];

/// Insert [`DEFAULT_WORDS`] if the store has no words yet. Returns how many were added.
pub async fn seed_default_words(store: &dyn GameStore) -> StoreResult<usize> {
    let existing = store.list_words().await?;
    if !existing.is_empty() {
        tracing::info!("Store already has {} words, skipping seed", existing.len());
        return Ok(0);
    }

    for (word, clue, direction) in DEFAULT_WORDS {
        store
            .create_word(NewWord {
                word: word.to_string(),
                clue: clue.to_string(),
                direction: Some(*direction),
            })
            .await?;
    }
    tracing::info!("Seeded {} default words", DEFAULT_WORDS.len());

    Ok(DEFAULT_WORDS.len())
}
