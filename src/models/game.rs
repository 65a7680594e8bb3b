use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::WordDirection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step `distance` cells from this position in `direction`.
    /// Returns `None` when the step would leave the non-negative quadrant.
    pub fn offset(&self, direction: WordDirection, distance: usize) -> Option<Position> {
        let (d_row, d_col) = direction.delta();
        let row = self.row as isize + d_row * distance as isize;
        let col = self.col as isize + d_col * distance as isize;
        if row < 0 || col < 0 {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }
}

/// A square letter grid. Every cell holds exactly one uppercase letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.row < self.size() && pos.col < self.size()
    }

    pub fn letter(&self, pos: &Position) -> Option<char> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    /// Extract the word spelled by `positions`, in order
    pub fn spell(&self, positions: &[Position]) -> Option<String> {
        positions.iter().map(|pos| self.letter(pos)).collect()
    }
}

/// A word written into the grid, with one position per letter in placement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub direction: WordDirection,
    pub positions: Vec<Position>,
}

impl PlacedWord {
    pub fn occupies(&self, cells: &[Position]) -> bool {
        if cells.len() != self.positions.len() {
            return false;
        }
        cells == self.positions.as_slice() || cells.iter().rev().eq(self.positions.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: i32,
    pub player_id: i32,
    /// Seconds
    pub time_taken: i32,
    pub words_found: i32,
    pub total_words: i32,
    pub completed: bool,
    pub completed_at: DateTime<Utc>,
}

/// A finished game waiting to be recorded. `completed` means every placed word was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResult {
    pub player_id: i32,
    pub time_taken: i32,
    pub words_found: i32,
    pub total_words: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: i32,
    pub employee_id: String,
    pub name: String,
    pub time_taken: i32,
    pub words_found: i32,
    pub total_words: i32,
    pub completed: bool,
    pub completed_at: DateTime<Utc>,
    pub rank: i64,
}
