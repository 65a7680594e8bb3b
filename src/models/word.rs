use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One of the eight straight lines a word can run along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, Hash, Eq, PartialEq)]
#[sqlx(type_name = "VARCHAR", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WordDirection {
    LeftRight,
    RightLeft,
    TopBottom,
    BottomTop,
    DiagonalDownRight,
    DiagonalDownLeft,
    DiagonalUpRight,
    DiagonalUpLeft,
}

impl WordDirection {
    pub const ALL: [WordDirection; 8] = [
        WordDirection::LeftRight,
        WordDirection::RightLeft,
        WordDirection::TopBottom,
        WordDirection::BottomTop,
        WordDirection::DiagonalDownRight,
        WordDirection::DiagonalDownLeft,
        WordDirection::DiagonalUpRight,
        WordDirection::DiagonalUpLeft,
    ];

    /// (row, col) step between consecutive letters
    pub fn delta(self) -> (isize, isize) {
        match self {
            WordDirection::LeftRight => (0, 1),
            WordDirection::RightLeft => (0, -1),
            WordDirection::TopBottom => (1, 0),
            WordDirection::BottomTop => (-1, 0),
            WordDirection::DiagonalDownRight => (1, 1),
            WordDirection::DiagonalDownLeft => (1, -1),
            WordDirection::DiagonalUpRight => (-1, 1),
            WordDirection::DiagonalUpLeft => (-1, -1),
        }
    }
}

/// A puzzle word as managed from the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i32,
    pub word: String,
    pub clue: String,
    /// `None` lets the generator pick any direction
    pub direction: Option<WordDirection>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub word: String,
    pub clue: String,
    #[serde(default)]
    pub direction: Option<WordDirection>,
}

/// Input to the grid generator: the text to hide and an optional pinned direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub direction: Option<WordDirection>,
}

impl WordEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: None,
        }
    }

    pub fn pinned(text: impl Into<String>, direction: WordDirection) -> Self {
        Self {
            text: text.into(),
            direction: Some(direction),
        }
    }
}

impl From<&Word> for WordEntry {
    fn from(word: &Word) -> Self {
        Self {
            text: word.word.clone(),
            direction: word.direction,
        }
    }
}
