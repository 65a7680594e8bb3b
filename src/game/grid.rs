use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{Grid, PlacedWord, Position, WordDirection, WordEntry},
    utils::letters::{normalize_word, random_letter},
};

/// Grid edge length used when nothing else is configured
pub const DEFAULT_GRID_SIZE: usize = 14;
/// Placement attempts per word before it is given up on
pub const DEFAULT_MAX_ATTEMPTS: u32 = 500;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be at least 1, got {0}")]
    InvalidSize(usize),
}

/// A freshly generated puzzle: the filled grid, where each word went, and which words did not fit.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub grid: Grid,
    pub placed_words: Vec<PlacedWord>,
    pub unplaced_words: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GridGenerator {
    size: usize,
    max_attempts: u32,
}

impl GridGenerator {
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self {
            size,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Generate a new grid with `words` hidden in it.
    ///
    /// Words are placed in the order given. Each word gets up to `max_attempts`
    /// random start cells; a word still unplaced after that lands in
    /// `unplaced_words`. Overlaps are allowed only where the letters agree, and
    /// the first word written to a cell owns it. Remaining cells get uniformly
    /// random letters.
    pub fn generate(&self, words: &[WordEntry], rng: &mut impl Rng) -> Generation {
        let mut cells: Vec<Vec<Option<char>>> = vec![vec![None; self.size]; self.size];
        let mut placed_words = Vec::with_capacity(words.len());
        let mut unplaced_words = Vec::new();

        for entry in words {
            let word = normalize_word(&entry.text);
            let letters: Vec<char> = word.chars().collect();

            if letters.is_empty() {
                tracing::warn!("Skipping empty puzzle word");
                unplaced_words.push(word);
                continue;
            }

            match self.place_word(&mut cells, &letters, entry.direction, rng) {
                Some((direction, positions)) => {
                    tracing::debug!("Placed {} going {:?} at {:?}", word, direction, positions[0]);
                    placed_words.push(PlacedWord {
                        word,
                        direction,
                        positions,
                    });
                }
                None => {
                    tracing::warn!(
                        "Could not place {} in a {}x{} grid after {} attempts",
                        word,
                        self.size,
                        self.size,
                        self.max_attempts
                    );
                    unplaced_words.push(word);
                }
            }
        }

        let mut rows = Vec::with_capacity(self.size);
        for row in cells {
            let mut letters = Vec::with_capacity(self.size);
            for cell in row {
                letters.push(match cell {
                    Some(letter) => letter,
                    None => random_letter(rng),
                });
            }
            rows.push(letters);
        }

        Generation {
            grid: Grid::from_rows(rows),
            placed_words,
            unplaced_words,
        }
    }

    fn place_word(
        &self,
        cells: &mut [Vec<Option<char>>],
        letters: &[char],
        pinned: Option<WordDirection>,
        rng: &mut impl Rng,
    ) -> Option<(WordDirection, Vec<Position>)> {
        for _ in 0..self.max_attempts {
            let start = Position::new(rng.random_range(0..self.size), rng.random_range(0..self.size));
            let direction = pinned.unwrap_or_else(|| {
                WordDirection::ALL[rng.random_range(0..WordDirection::ALL.len())]
            });

            let Some(positions) = self.fit(cells, letters, start, direction) else {
                continue;
            };

            for (pos, letter) in positions.iter().zip(letters) {
                cells[pos.row][pos.col] = Some(*letter);
            }
            return Some((direction, positions));
        }

        None
    }

    /// Positions for `letters` starting at `start`, if every one is in bounds
    /// and either empty or already holding the same letter.
    fn fit(
        &self,
        cells: &[Vec<Option<char>>],
        letters: &[char],
        start: Position,
        direction: WordDirection,
    ) -> Option<Vec<Position>> {
        let mut positions = Vec::with_capacity(letters.len());

        for (i, letter) in letters.iter().enumerate() {
            let pos = start.offset(direction, i)?;
            if pos.row >= self.size || pos.col >= self.size {
                return None;
            }
            if let Some(existing) = cells[pos.row][pos.col] {
                if existing != *letter {
                    return None;
                }
            }
            positions.push(pos);
        }

        Some(positions)
    }
}
