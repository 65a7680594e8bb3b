use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{
    grid::{Generation, GridError, GridGenerator},
    selection::SelectionMatcher,
};
use crate::models::{Grid, NewGameResult, Player, Position, WordEntry};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("register a player before starting")]
    NotRegistered,
    #[error("game is not in progress")]
    NotPlaying,
    #[error("game already in progress")]
    AlreadyPlaying,
    #[error("game is over; start a new session to play again")]
    SessionCompleted,
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Playing,
    Completed,
}

/// The final tally of a session, produced once when it completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub player_id: i32,
    /// Seconds spent playing
    pub time_taken: u32,
    pub words_found: usize,
    pub total_words: usize,
    /// Every findable word was found before time ran out
    pub completed: bool,
}

impl From<&GameOutcome> for NewGameResult {
    fn from(outcome: &GameOutcome) -> Self {
        Self {
            player_id: outcome.player_id,
            time_taken: outcome.time_taken as i32,
            words_found: outcome.words_found as i32,
            total_words: outcome.total_words as i32,
            completed: outcome.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    WordFound {
        word: String,
        positions: Vec<Position>,
        found: usize,
        total: usize,
    },
    NoMatch,
    Tick {
        remaining: u32,
    },
    Completed(GameOutcome),
}

/// One player's game: `Idle -> Playing -> Completed`.
///
/// The session owns its grid and matcher outright; it is driven by gesture
/// events and a one-second tick and never touches storage itself. Completion
/// happens at most once, whichever of "all words found" and "time up" is seen
/// first.
pub struct GameSession {
    id: Uuid,
    generator: GridGenerator,
    words: Vec<WordEntry>,
    timer_duration: u32,
    rng: StdRng,
    state: SessionState,
    player: Option<Player>,
    matcher: SelectionMatcher,
    unplaced_words: Vec<String>,
    elapsed: u32,
    submitted: bool,
}

impl GameSession {
    pub fn new(generator: GridGenerator, words: Vec<WordEntry>, timer_duration: u32) -> Self {
        Self::with_rng(generator, words, timer_duration, StdRng::from_os_rng())
    }

    pub fn with_rng(
        generator: GridGenerator,
        words: Vec<WordEntry>,
        timer_duration: u32,
        mut rng: StdRng,
    ) -> Self {
        let Generation {
            grid,
            placed_words,
            unplaced_words,
        } = generator.generate(&words, &mut rng);

        Self {
            id: Uuid::new_v4(),
            generator,
            words,
            timer_duration,
            rng,
            state: SessionState::Idle,
            player: None,
            matcher: SelectionMatcher::new(grid, placed_words),
            unplaced_words,
            elapsed: 0,
            submitted: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        self.matcher.grid()
    }

    pub fn matcher(&self) -> &SelectionMatcher {
        &self.matcher
    }

    pub fn unplaced_words(&self) -> &[String] {
        &self.unplaced_words
    }

    pub fn timer_duration(&self) -> u32 {
        self.timer_duration
    }

    pub fn remaining(&self) -> u32 {
        self.timer_duration.saturating_sub(self.elapsed)
    }

    /// The words a player can find on the current grid
    pub fn findable_words(&self) -> Vec<String> {
        self.matcher.findable_words()
    }

    /// Words needed to finish; words that did not fit in the grid are not counted
    pub fn total_words(&self) -> usize {
        self.matcher.findable_count()
    }

    pub fn register_player(&mut self, player: Player) -> Result<(), GameError> {
        match self.state {
            SessionState::Idle => {
                self.player = Some(player);
                Ok(())
            }
            SessionState::Playing => Err(GameError::AlreadyPlaying),
            SessionState::Completed => Err(GameError::SessionCompleted),
        }
    }

    /// Begin play on a fresh grid
    pub fn start(&mut self) -> Result<(), GameError> {
        match self.state {
            SessionState::Playing => return Err(GameError::AlreadyPlaying),
            SessionState::Completed => return Err(GameError::SessionCompleted),
            SessionState::Idle => {}
        }
        if self.player.is_none() {
            return Err(GameError::NotRegistered);
        }

        self.regenerate();
        self.state = SessionState::Playing;
        tracing::info!(
            "Session {} started with {} words ({} unplaced)",
            self.id,
            self.total_words(),
            self.unplaced_words.len()
        );
        Ok(())
    }

    /// Throw away progress and go back to idle with a new grid
    pub fn reset(&mut self) -> Result<(), GameError> {
        if self.state == SessionState::Completed {
            return Err(GameError::SessionCompleted);
        }

        self.regenerate();
        self.state = SessionState::Idle;
        Ok(())
    }

    pub fn begin_selection(&mut self, cell: Position) -> Result<(), GameError> {
        self.ensure_playing()?;
        self.matcher.begin_selection(cell);
        Ok(())
    }

    pub fn extend_selection(&mut self, cell: Position) -> Result<bool, GameError> {
        self.ensure_playing()?;
        Ok(self.matcher.extend_selection(cell))
    }

    pub fn end_selection(&mut self) -> Result<Vec<SessionEvent>, GameError> {
        self.ensure_playing()?;

        let Some(word) = self.matcher.end_selection() else {
            return Ok(vec![SessionEvent::NoMatch]);
        };

        let positions = self
            .matcher
            .placed_words()
            .iter()
            .filter(|placed| placed.word == word)
            .flat_map(|placed| placed.positions.iter().copied())
            .filter(|pos| self.matcher.is_cell_found(pos))
            .collect();
        let found = self.matcher.found_count();
        let total = self.total_words();
        tracing::debug!("Session {} found {} ({}/{})", self.id, word, found, total);

        let mut events = vec![SessionEvent::WordFound {
            word,
            positions,
            found,
            total,
        }];
        if total > 0 && found == total {
            events.extend(self.complete(true).map(SessionEvent::Completed));
        }
        Ok(events)
    }

    /// Advance the clock by one second. Ticks outside of play are ignored.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::Playing {
            return Vec::new();
        }

        self.elapsed = self.elapsed.saturating_add(1);
        let remaining = self.remaining();
        let mut events = vec![SessionEvent::Tick { remaining }];
        if remaining == 0 {
            events.extend(self.complete(false).map(SessionEvent::Completed));
        }
        events
    }

    fn complete(&mut self, all_found: bool) -> Option<GameOutcome> {
        if self.submitted {
            return None;
        }
        let player = self.player.as_ref()?;
        self.submitted = true;
        self.state = SessionState::Completed;

        let outcome = GameOutcome {
            player_id: player.id,
            time_taken: self.elapsed,
            words_found: self.matcher.found_count(),
            total_words: self.total_words(),
            completed: all_found,
        };
        tracing::info!(
            "Session {} completed: {}/{} words in {}s",
            self.id,
            outcome.words_found,
            outcome.total_words,
            outcome.time_taken
        );
        Some(outcome)
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.state {
            SessionState::Playing => Ok(()),
            SessionState::Completed => Err(GameError::SessionCompleted),
            SessionState::Idle => Err(GameError::NotPlaying),
        }
    }

    fn regenerate(&mut self) {
        let Generation {
            grid,
            placed_words,
            unplaced_words,
        } = self.generator.generate(&self.words, &mut self.rng);
        self.matcher = SelectionMatcher::new(grid, placed_words);
        self.unplaced_words = unplaced_words;
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordDirection;
    use chrono::Utc;

    fn player() -> Player {
        Player {
            id: 7,
            employee_id: "E-100".to_string(),
            name: "Test Player".to_string(),
            created_at: Utc::now(),
        }
    }

    fn session(words: Vec<WordEntry>, timer_duration: u32) -> GameSession {
        GameSession::with_rng(
            GridGenerator::new(8).unwrap(),
            words,
            timer_duration,
            StdRng::seed_from_u64(1234),
        )
    }

    fn two_words() -> Vec<WordEntry> {
        vec![
            WordEntry::pinned("cat", WordDirection::LeftRight),
            WordEntry::pinned("dog", WordDirection::TopBottom),
        ]
    }

    fn find(session: &mut GameSession, word: &str) -> Vec<SessionEvent> {
        let positions = session
            .matcher()
            .placed_words()
            .iter()
            .find(|placed| placed.word == word)
            .map(|placed| placed.positions.clone())
            .unwrap();
        session.begin_selection(positions[0]).unwrap();
        for cell in &positions[1..] {
            session.extend_selection(*cell).unwrap();
        }
        session.end_selection().unwrap()
    }

    fn completions(events: &[SessionEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, SessionEvent::Completed(_)))
            .count()
    }

    #[test]
    fn test_new_session_is_idle_with_grid() {
        let session = session(two_words(), 60);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.grid().size(), 8);
        assert_eq!(session.total_words(), 2);
    }

    #[test]
    fn test_start_requires_player() {
        let mut session = session(two_words(), 60);
        assert_eq!(session.start(), Err(GameError::NotRegistered));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_gestures_rejected_while_idle() {
        let mut session = session(two_words(), 60);
        assert_eq!(
            session.begin_selection(Position::new(0, 0)),
            Err(GameError::NotPlaying)
        );
        assert!(session.tick().is_empty());
    }

    #[test]
    fn test_finding_all_words_completes_once() {
        let mut session = session(two_words(), 60);
        session.register_player(player()).unwrap();
        session.start().unwrap();

        let events = find(&mut session, "CAT");
        assert_eq!(completions(&events), 0);
        assert_eq!(session.state(), SessionState::Playing);

        session.tick();
        let events = find(&mut session, "DOG");
        assert_eq!(completions(&events), 1);
        assert_eq!(session.state(), SessionState::Completed);

        let outcome = events
            .iter()
            .find_map(|event| match event {
                SessionEvent::Completed(outcome) => Some(outcome.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            outcome,
            GameOutcome {
                player_id: 7,
                time_taken: 1,
                words_found: 2,
                total_words: 2,
                completed: true,
            }
        );

        // A tick landing in the same instant must not complete again
        assert!(session.tick().is_empty());
    }

    #[test]
    fn test_timer_expiry_completes_once() {
        let mut session = session(two_words(), 3);
        session.register_player(player()).unwrap();
        session.start().unwrap();
        find(&mut session, "CAT");

        assert_eq!(session.tick(), vec![SessionEvent::Tick { remaining: 2 }]);
        assert_eq!(session.tick(), vec![SessionEvent::Tick { remaining: 1 }]);
        let events = session.tick();
        assert_eq!(completions(&events), 1);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::Completed(GameOutcome {
                player_id: 7,
                time_taken: 3,
                words_found: 1,
                total_words: 2,
                completed: false,
            }))
        );

        assert_eq!(
            session.begin_selection(Position::new(0, 0)),
            Err(GameError::SessionCompleted)
        );
        assert!(session.tick().is_empty());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut session = session(two_words(), 1);
        session.register_player(player()).unwrap();
        session.start().unwrap();
        session.tick();

        assert_eq!(session.start(), Err(GameError::SessionCompleted));
        assert_eq!(session.reset(), Err(GameError::SessionCompleted));
        assert_eq!(session.register_player(player()), Err(GameError::SessionCompleted));
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut session = session(two_words(), 60);
        session.register_player(player()).unwrap();
        session.start().unwrap();
        find(&mut session, "CAT");
        session.tick();

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.matcher().found_count(), 0);
        assert_eq!(session.remaining(), 60);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_unplaced_words_do_not_block_completion() {
        let words = vec![
            WordEntry::pinned("cat", WordDirection::LeftRight),
            WordEntry::new("improvement"),
        ];
        let mut session = session(words, 60);
        session.register_player(player()).unwrap();
        session.start().unwrap();
        assert_eq!(session.unplaced_words(), &["IMPROVEMENT".to_string()]);
        assert_eq!(session.findable_words(), vec!["CAT".to_string()]);
        assert_eq!(session.total_words(), 1);

        let events = find(&mut session, "CAT");
        assert_eq!(completions(&events), 1);
    }

    #[test]
    fn test_no_words_only_times_out() {
        let mut session = session(Vec::new(), 2);
        session.register_player(player()).unwrap();
        session.start().unwrap();

        session.begin_selection(Position::new(0, 0)).unwrap();
        session.extend_selection(Position::new(0, 1)).unwrap();
        assert_eq!(session.end_selection().unwrap(), vec![SessionEvent::NoMatch]);
        assert_eq!(session.state(), SessionState::Playing);

        session.tick();
        assert_eq!(completions(&session.tick()), 1);
    }

    #[test]
    fn test_outcome_converts_to_result() {
        let outcome = GameOutcome {
            player_id: 3,
            time_taken: 42,
            words_found: 5,
            total_words: 10,
            completed: false,
        };
        let result = NewGameResult::from(&outcome);
        assert_eq!(result.player_id, 3);
        assert_eq!(result.time_taken, 42);
        assert_eq!(result.words_found, 5);
        assert_eq!(result.total_words, 10);
        assert!(!result.completed);
    }
}
