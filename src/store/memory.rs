use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{GameStore, StoreError, StoreResult, TIMER_DURATION_KEY};
use crate::models::{
    GameResult, GameSetting, LeaderboardEntry, NewGameResult, NewWord, Player, Word,
};

#[derive(Default)]
struct Tables {
    words: Vec<Word>,
    players: Vec<Player>,
    results: Vec<GameResult>,
    settings: BTreeMap<String, GameSetting>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store that lives and dies with the process. Used by tests and `STORE=memory`.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    default_timer_duration: u32,
}

impl MemoryStore {
    pub fn new(default_timer_duration: u32) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            default_timer_duration,
        }
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn list_words(&self) -> StoreResult<Vec<Word>> {
        Ok(self.tables.read().await.words.clone())
    }

    async fn create_word(&self, word: NewWord) -> StoreResult<Word> {
        let mut tables = self.tables.write().await;
        let word = Word {
            id: tables.next_id(),
            word: word.word,
            clue: word.clue,
            direction: word.direction,
            created_at: Utc::now(),
        };
        tables.words.push(word.clone());
        Ok(word)
    }

    async fn update_word(&self, id: i32, word: NewWord) -> StoreResult<Word> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StoreError::WordNotFound(id))?;

        existing.word = word.word;
        existing.clue = word.clue;
        existing.direction = word.direction;
        Ok(existing.clone())
    }

    async fn delete_word(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.words.len();
        tables.words.retain(|w| w.id != id);
        if tables.words.len() == before {
            return Err(StoreError::WordNotFound(id));
        }
        Ok(())
    }

    async fn settings(&self) -> StoreResult<BTreeMap<String, String>> {
        let mut tables = self.tables.write().await;
        if !tables.settings.contains_key(TIMER_DURATION_KEY) {
            tables.settings.insert(
                TIMER_DURATION_KEY.to_string(),
                GameSetting {
                    setting_key: TIMER_DURATION_KEY.to_string(),
                    setting_value: self.default_timer_duration.to_string(),
                    updated_at: Utc::now(),
                },
            );
        }

        Ok(tables
            .settings
            .values()
            .map(|s| (s.setting_key.clone(), s.setting_value.clone()))
            .collect())
    }

    async fn set_setting(&self, key: &str, value: &str) -> StoreResult<GameSetting> {
        let setting = GameSetting {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
            updated_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .settings
            .insert(key.to_string(), setting.clone());
        Ok(setting)
    }

    async fn register_player(&self, employee_id: &str, name: &str) -> StoreResult<Player> {
        let mut tables = self.tables.write().await;

        if let Some(player) = tables.players.iter().find(|p| p.employee_id == employee_id) {
            if tables.results.iter().any(|r| r.player_id == player.id) {
                return Err(StoreError::AlreadyCompleted(employee_id.to_string()));
            }
            return Ok(player.clone());
        }

        let player = Player {
            id: tables.next_id(),
            employee_id: employee_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.players.push(player.clone());
        Ok(player)
    }

    async fn has_completed(&self, employee_id: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .players
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .any(|p| tables.results.iter().any(|r| r.player_id == p.id)))
    }

    async fn submit_result(&self, result: NewGameResult) -> StoreResult<GameResult> {
        let mut tables = self.tables.write().await;

        if !tables.players.iter().any(|p| p.id == result.player_id) {
            return Err(StoreError::PlayerNotFound(result.player_id));
        }
        if tables.results.iter().any(|r| r.player_id == result.player_id) {
            return Err(StoreError::DuplicateResult(result.player_id));
        }

        let record = GameResult {
            id: tables.next_id(),
            player_id: result.player_id,
            time_taken: result.time_taken,
            words_found: result.words_found,
            total_words: result.total_words,
            completed: result.completed,
            completed_at: Utc::now(),
        };
        tables.results.push(record.clone());
        Ok(record)
    }

    async fn leaderboard(&self) -> StoreResult<Vec<LeaderboardEntry>> {
        let tables = self.tables.read().await;

        let mut results: Vec<&GameResult> = tables.results.iter().collect();
        results.sort_by(|a, b| {
            b.completed
                .cmp(&a.completed)
                .then(b.words_found.cmp(&a.words_found))
                .then(a.time_taken.cmp(&b.time_taken))
                .then(a.id.cmp(&b.id))
        });

        Ok(results
            .into_iter()
            .filter_map(|r| {
                let player = tables.players.iter().find(|p| p.id == r.player_id)?;
                Some((r, player))
            })
            .enumerate()
            .map(|(idx, (r, player))| LeaderboardEntry {
                id: r.id,
                employee_id: player.employee_id.clone(),
                name: player.name.clone(),
                time_taken: r.time_taken,
                words_found: r.words_found,
                total_words: r.total_words,
                completed: r.completed,
                completed_at: r.completed_at,
                rank: idx as i64 + 1,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordDirection;

    fn result(player_id: i32, time_taken: i32, words_found: i32, completed: bool) -> NewGameResult {
        NewGameResult {
            player_id,
            time_taken,
            words_found,
            total_words: 10,
            completed,
        }
    }

    #[tokio::test]
    async fn test_word_crud() {
        let store = MemoryStore::new(10);
        let word = store
            .create_word(NewWord {
                word: "AUDIT".to_string(),
                clue: "Official inspection".to_string(),
                direction: Some(WordDirection::TopBottom),
            })
            .await
            .unwrap();

        let updated = store
            .update_word(
                word.id,
                NewWord {
                    word: "AUDITS".to_string(),
                    clue: "Inspections".to_string(),
                    direction: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.word, "AUDITS");
        assert_eq!(updated.direction, None);

        store.delete_word(word.id).await.unwrap();
        assert!(store.list_words().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_word(word.id).await,
            Err(StoreError::WordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_timer_default_persisted() {
        let store = MemoryStore::new(45);
        assert_eq!(store.timer_duration().await.unwrap(), 45);

        store.set_setting(TIMER_DURATION_KEY, "120").await.unwrap();
        assert_eq!(store.timer_duration().await.unwrap(), 120);
        assert_eq!(
            store.settings().await.unwrap().get(TIMER_DURATION_KEY).map(String::as_str),
            Some("120")
        );
    }

    #[tokio::test]
    async fn test_register_is_idempotent_until_completed() {
        let store = MemoryStore::new(10);
        let first = store.register_player("E-1", "Ada").await.unwrap();
        let again = store.register_player("E-1", "Ada L.").await.unwrap();
        assert_eq!(first, again);
        assert!(!store.has_completed("E-1").await.unwrap());

        store.submit_result(result(first.id, 30, 10, true)).await.unwrap();
        assert!(store.has_completed("E-1").await.unwrap());
        assert!(matches!(
            store.register_player("E-1", "Ada").await,
            Err(StoreError::AlreadyCompleted(_))
        ));
    }

    #[tokio::test]
    async fn test_one_result_per_player() {
        let store = MemoryStore::new(10);
        let player = store.register_player("E-2", "Grace").await.unwrap();
        store.submit_result(result(player.id, 10, 3, false)).await.unwrap();
        assert!(matches!(
            store.submit_result(result(player.id, 5, 10, true)).await,
            Err(StoreError::DuplicateResult(_))
        ));
        assert!(matches!(
            store.submit_result(result(999, 5, 10, true)).await,
            Err(StoreError::PlayerNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_leaderboard_ordering() {
        let store = MemoryStore::new(10);
        let slow = store.register_player("E-slow", "Slow").await.unwrap();
        let fast = store.register_player("E-fast", "Fast").await.unwrap();
        let partial = store.register_player("E-partial", "Partial").await.unwrap();
        let fewer = store.register_player("E-fewer", "Fewer").await.unwrap();

        store.submit_result(result(partial.id, 5, 9, false)).await.unwrap();
        store.submit_result(result(slow.id, 90, 10, true)).await.unwrap();
        store.submit_result(result(fewer.id, 5, 2, false)).await.unwrap();
        store.submit_result(result(fast.id, 40, 10, true)).await.unwrap();

        let board = store.leaderboard().await.unwrap();
        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Fast", "Slow", "Partial", "Fewer"]);
        let ranks: Vec<i64> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }
}
