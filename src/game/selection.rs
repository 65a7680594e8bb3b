use std::collections::HashSet;

use crate::models::{Grid, PlacedWord, Position};

/// Tracks a player's drag across the grid and matches it against the hidden words.
///
/// Only one selection is in flight at a time. Found cells and found words only
/// grow; build a new matcher to start over.
#[derive(Debug, Clone)]
pub struct SelectionMatcher {
    grid: Grid,
    placed_words: Vec<PlacedWord>,
    selection: Option<Vec<Position>>,
    found_cells: HashSet<Position>,
    found_words: HashSet<String>,
}

impl SelectionMatcher {
    pub fn new(grid: Grid, placed_words: Vec<PlacedWord>) -> Self {
        Self {
            grid,
            placed_words,
            selection: None,
            found_cells: HashSet::new(),
            found_words: HashSet::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn placed_words(&self) -> &[PlacedWord] {
        &self.placed_words
    }

    /// Distinct placed words, in placement order
    pub fn findable_words(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.placed_words
            .iter()
            .filter(|placed| seen.insert(placed.word.as_str()))
            .map(|placed| placed.word.clone())
            .collect()
    }

    /// Number of distinct words that can be found
    pub fn findable_count(&self) -> usize {
        self.placed_words
            .iter()
            .map(|placed| placed.word.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Start a new selection at `cell`, dropping any unfinished one.
    pub fn begin_selection(&mut self, cell: Position) {
        self.selection = Some(vec![cell]);
    }

    /// Append `cell` if it continues the drag in a straight line from the last
    /// selected cell. Returns whether the cell was taken.
    pub fn extend_selection(&mut self, cell: Position) -> bool {
        if !self.grid.contains(&cell) {
            return false;
        }
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        let Some(last) = selection.last() else {
            return false;
        };
        if *last == cell || !is_straight_step(last, &cell) {
            return false;
        }

        selection.push(cell);
        true
    }

    /// Finish the drag. Returns the matched word, if the selected letters spell
    /// a hidden word forwards or backwards.
    pub fn end_selection(&mut self) -> Option<String> {
        let selection = self.selection.take()?;
        if selection.len() < 2 {
            return None;
        }

        let spelled = self.grid.spell(&selection)?;
        let reversed: String = spelled.chars().rev().collect();
        let spells = |placed: &&PlacedWord| placed.word == spelled || placed.word == reversed;

        // Prefer the placement under the cursor when a word appears more than once
        let matched = self
            .placed_words
            .iter()
            .filter(spells)
            .find(|placed| placed.occupies(&selection))
            .or_else(|| self.placed_words.iter().find(spells))?;

        self.found_cells.extend(matched.positions.iter().copied());
        self.found_words.insert(matched.word.clone());
        Some(matched.word.clone())
    }

    pub fn selection(&self) -> &[Position] {
        self.selection.as_deref().unwrap_or_default()
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    pub fn is_cell_selected(&self, cell: &Position) -> bool {
        self.selection().contains(cell)
    }

    pub fn is_cell_found(&self, cell: &Position) -> bool {
        self.found_cells.contains(cell)
    }

    pub fn is_word_found(&self, word: &str) -> bool {
        self.found_words.contains(word)
    }

    pub fn found_words(&self) -> &HashSet<String> {
        &self.found_words
    }

    pub fn found_count(&self) -> usize {
        self.found_words.len()
    }
}

/// Same row, same column, or a 45° diagonal
fn is_straight_step(from: &Position, to: &Position) -> bool {
    let row_diff = from.row.abs_diff(to.row);
    let col_diff = from.col.abs_diff(to.col);

    row_diff == 0 || col_diff == 0 || row_diff == col_diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::grid::GridGenerator,
        models::{WordDirection, WordEntry},
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// C A T Q
    /// O X D O
    /// G Z Y G
    /// Q W E R
    fn matcher() -> SelectionMatcher {
        let grid = Grid::from_rows(vec![
            vec!['C', 'A', 'T', 'Q'],
            vec!['O', 'X', 'D', 'O'],
            vec!['G', 'Z', 'Y', 'G'],
            vec!['Q', 'W', 'E', 'R'],
        ]);
        let placed = vec![
            PlacedWord {
                word: "CAT".to_string(),
                direction: WordDirection::LeftRight,
                positions: vec![pos(0, 0), pos(0, 1), pos(0, 2)],
            },
            PlacedWord {
                word: "COG".to_string(),
                direction: WordDirection::TopBottom,
                positions: vec![pos(0, 0), pos(1, 0), pos(2, 0)],
            },
            PlacedWord {
                word: "DOG".to_string(),
                direction: WordDirection::DiagonalDownRight,
                positions: vec![pos(1, 2), pos(1, 3), pos(2, 3)],
            },
        ];
        SelectionMatcher::new(grid, placed)
    }

    fn drag(matcher: &mut SelectionMatcher, cells: &[Position]) -> Option<String> {
        matcher.begin_selection(cells[0]);
        for cell in &cells[1..] {
            matcher.extend_selection(*cell);
        }
        matcher.end_selection()
    }

    #[test]
    fn test_forward_selection_matches() {
        let mut matcher = matcher();
        let found = drag(&mut matcher, &[pos(0, 0), pos(0, 1), pos(0, 2)]);
        assert_eq!(found.as_deref(), Some("CAT"));
        assert!(matcher.is_word_found("CAT"));
        assert!(matcher.is_cell_found(&pos(0, 1)));
        assert!(!matcher.is_cell_found(&pos(1, 0)));
    }

    #[test]
    fn test_reverse_selection_matches_same_word() {
        let mut matcher = matcher();
        let found = drag(&mut matcher, &[pos(2, 0), pos(1, 0), pos(0, 0)]);
        assert_eq!(found.as_deref(), Some("COG"));
        assert_eq!(matcher.found_count(), 1);
    }

    #[test]
    fn test_substring_does_not_match() {
        let mut matcher = matcher();
        assert_eq!(drag(&mut matcher, &[pos(0, 0), pos(0, 1)]), None);
        assert_eq!(matcher.found_count(), 0);
    }

    #[test]
    fn test_single_cell_release_is_no_match() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 0));
        assert_eq!(matcher.end_selection(), None);
        assert!(!matcher.is_selecting());
    }

    #[test]
    fn test_end_without_begin_is_no_match() {
        let mut matcher = matcher();
        assert_eq!(matcher.end_selection(), None);
    }

    #[test]
    fn test_knight_move_is_ignored() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 0));
        assert!(!matcher.extend_selection(pos(1, 2)));
        assert_eq!(matcher.selection(), &[pos(0, 0)]);
    }

    #[test]
    fn test_repeated_cell_is_ignored() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 0));
        assert!(matcher.extend_selection(pos(0, 1)));
        assert!(!matcher.extend_selection(pos(0, 1)));
        assert_eq!(matcher.selection().len(), 2);
    }

    #[test]
    fn test_out_of_grid_cell_is_ignored() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 3));
        assert!(!matcher.extend_selection(pos(0, 4)));
        assert_eq!(matcher.selection().len(), 1);
    }

    #[test]
    fn test_extend_without_active_selection() {
        let mut matcher = matcher();
        assert!(!matcher.extend_selection(pos(0, 1)));
        assert!(!matcher.is_cell_selected(&pos(0, 1)));
    }

    #[test]
    fn test_stray_cell_does_not_break_gesture() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 0));
        matcher.extend_selection(pos(0, 1));
        matcher.extend_selection(pos(2, 2)); // knight move from (0, 1)
        matcher.extend_selection(pos(0, 2));
        assert_eq!(matcher.end_selection().as_deref(), Some("CAT"));
    }

    #[test]
    fn test_begin_discards_unfinished_selection() {
        let mut matcher = matcher();
        matcher.begin_selection(pos(0, 0));
        matcher.extend_selection(pos(0, 1));
        matcher.begin_selection(pos(3, 0));
        assert_eq!(matcher.selection(), &[pos(3, 0)]);
        assert!(!matcher.is_cell_selected(&pos(0, 1)));
        assert_eq!(matcher.found_count(), 0);
    }

    #[test]
    fn test_selection_cleared_after_match() {
        let mut matcher = matcher();
        drag(&mut matcher, &[pos(0, 0), pos(0, 1), pos(0, 2)]);
        assert!(matcher.selection().is_empty());
        assert!(!matcher.is_cell_selected(&pos(0, 0)));
    }

    #[test]
    fn test_finding_a_word_twice_does_not_double_count() {
        let mut matcher = matcher();
        drag(&mut matcher, &[pos(0, 0), pos(0, 1), pos(0, 2)]);
        drag(&mut matcher, &[pos(0, 2), pos(0, 1), pos(0, 0)]);
        assert_eq!(matcher.found_count(), 1);
    }

    #[test]
    fn test_duplicate_placement_prefers_selected_cells() {
        let grid = Grid::from_rows(vec![vec!['A', 'B'], vec!['B', 'A']]);
        let placed = vec![
            PlacedWord {
                word: "AB".to_string(),
                direction: WordDirection::LeftRight,
                positions: vec![pos(0, 0), pos(0, 1)],
            },
            PlacedWord {
                word: "AB".to_string(),
                direction: WordDirection::RightLeft,
                positions: vec![pos(1, 1), pos(1, 0)],
            },
        ];
        let mut matcher = SelectionMatcher::new(grid, placed);
        assert_eq!(matcher.findable_count(), 1);
        assert_eq!(matcher.findable_words(), vec!["AB".to_string()]);

        drag(&mut matcher, &[pos(1, 1), pos(1, 0)]);
        assert!(matcher.is_cell_found(&pos(1, 0)));
        assert!(!matcher.is_cell_found(&pos(0, 0)));
    }

    #[test]
    fn test_cat_scenario_on_generated_grid() {
        let generator = GridGenerator::new(4).unwrap();
        let generation = generator.generate(
            &[WordEntry::pinned("cat", WordDirection::LeftRight)],
            &mut StdRng::seed_from_u64(42),
        );
        let cells = generation.placed_words[0].positions.clone();

        let mut matcher = SelectionMatcher::new(generation.grid.clone(), generation.placed_words.clone());
        assert_eq!(drag(&mut matcher, &cells).as_deref(), Some("CAT"));

        let mut matcher = SelectionMatcher::new(generation.grid, generation.placed_words);
        let reversed: Vec<Position> = cells.into_iter().rev().collect();
        assert_eq!(drag(&mut matcher, &reversed).as_deref(), Some("CAT"));
    }

    #[test]
    fn test_every_generated_word_is_findable_both_ways() {
        let generator = GridGenerator::new(12).unwrap();
        let words = vec![
            WordEntry::new("quality"),
            WordEntry::new("standard"),
            WordEntry::new("customer"),
            WordEntry::new("audit"),
        ];
        for seed in 0..10 {
            let generation = generator.generate(&words, &mut StdRng::seed_from_u64(seed));
            for placed in &generation.placed_words {
                let mut forward =
                    SelectionMatcher::new(generation.grid.clone(), generation.placed_words.clone());
                assert_eq!(drag(&mut forward, &placed.positions).as_deref(), Some(placed.word.as_str()));

                let mut backward =
                    SelectionMatcher::new(generation.grid.clone(), generation.placed_words.clone());
                let reversed: Vec<Position> = placed.positions.iter().rev().copied().collect();
                assert_eq!(drag(&mut backward, &reversed).as_deref(), Some(placed.word.as_str()));
            }
        }
    }
}
