//! The common structures and traits.

use std::hash::Hash;

use crate::error::PlayError;

/// An assessment of a board from the perspective of the searching player.
/// Higher values mean a more favorable position.
/// A neutral position is defined as a score of zero.
pub type Score = i32;

/// Value of a won position. Terminal scores are multiplied by the remaining
/// depth + 1, so a win found sooner is worth more than a win found later and a
/// loss found later hurts less than one found sooner.
pub const WIN_SCORE: Score = 1000;

/// One of the two sides of a game.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Color {
    Red,
    Yellow,
}

impl Color {
    pub fn other(self) -> Self {
        match self {
            Color::Red => Color::Yellow,
            Color::Yellow => Color::Red,
        }
    }
}

/// Defines the rules of a drop-a-stone game on a grid of columns.
///
/// Every search branch works on its own copy, so implementations should be
/// cheap to clone. Columns are indexed from zero, rows from the bottom.
pub trait Board: Clone {
    /// Canonical encoding of the board contents and the side to move.
    /// Two boards with equal keys must be interchangeable for the search.
    type Key: Eq + Hash + Clone;

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// Whether a stone can be dropped into `column`.
    fn is_legal(&self, column: usize) -> bool;

    /// Drop a stone of `color` into `column`.
    /// Returns `false` and leaves the board untouched if the move is illegal.
    fn place_stone(&mut self, column: usize, color: Color) -> bool;

    /// Whether `color` has a winning line on the board.
    fn has_won(&self, color: Color) -> bool;

    fn other_player(&self, color: Color) -> Color {
        color.other()
    }

    /// The stone at (`row`, `column`), if any.
    fn cell(&self, row: usize, column: usize) -> Option<Color>;

    fn key(&self) -> Self::Key;

    /// Human-readable label of the stones of `color`.
    fn occupation_label(&self, color: Color) -> &'static str;

    /// No column accepts another stone.
    fn is_full(&self) -> bool {
        (0..self.columns()).all(|column| !self.is_legal(column))
    }
}

/// Leaf scoring hook used once the search runs out of depth.
///
/// Must be deterministic for a given board and stay strictly inside
/// `(-WIN_SCORE, WIN_SCORE)` so that it never outranks a proven result.
pub trait Evaluator<B: Board> {
    /// Score `board` for `color`, the side running the search.
    /// `depth` is the remaining depth, zero or below at the horizon.
    fn score(&self, board: &B, color: Color, depth: i32) -> Score;
}

/// Defines a method of choosing a column for one side of a match.
pub trait Player<B: Board> {
    fn color(&self) -> Color;

    /// Returns `Ok(None)` when the player has no move to offer.
    fn next_move(&mut self, board: &B) -> Result<Option<usize>, PlayError>;

    fn name(&self) -> String;
}

#[test]
fn test_other() {
    assert_eq!(Color::Red.other(), Color::Yellow);
    assert_eq!(Color::Yellow.other().other(), Color::Yellow);
}
