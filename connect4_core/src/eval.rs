//! Leaf evaluators plugged into the search at the horizon.

use crate::interface::{Board, Color, Evaluator, Score, WIN_SCORE};

/// Scores every board as zero. Leaves move choice to proven results and the
/// position order alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralEvaluator;

impl<B: Board> Evaluator<B> for NeutralEvaluator {
    fn score(&self, _board: &B, _color: Color, _depth: i32) -> Score {
        0
    }
}

// (row step, column step) of the four line directions
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];
const WINDOW: isize = 4;

/// Scores every window of four cells in a row by the stones it holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowEvaluator;

impl WindowEvaluator {
    fn score_window(own: usize, opponent: usize, empty: usize) -> Score {
        match (own, opponent, empty) {
            (3, 0, 1) => 5,
            (2, 0, 2) => 2,
            (0, 3, 1) => -8,
            (0, 2, 2) => -2,
            _ => 0,
        }
    }
}

impl<B: Board> Evaluator<B> for WindowEvaluator {
    fn score(&self, board: &B, color: Color, _depth: i32) -> Score {
        let rows = board.rows() as isize;
        let columns = board.columns() as isize;
        let mut score = 0;

        let center = board.columns() / 2;
        for row in 0..board.rows() {
            match board.cell(row, center) {
                Some(c) if c == color => score += 3,
                Some(_) => score -= 3,
                None => {}
            }
        }

        for row in 0..rows {
            for column in 0..columns {
                for (row_step, column_step) in DIRECTIONS {
                    let last_row = row + (WINDOW - 1) * row_step;
                    let last_column = column + (WINDOW - 1) * column_step;
                    if !(0..rows).contains(&last_row) || last_column >= columns {
                        continue;
                    }
                    let (mut own, mut opponent, mut empty) = (0, 0, 0);
                    for i in 0..WINDOW {
                        let cell = board.cell(
                            (row + i * row_step) as usize,
                            (column + i * column_step) as usize,
                        );
                        match cell {
                            Some(c) if c == color => own += 1,
                            Some(_) => opponent += 1,
                            None => empty += 1,
                        }
                    }
                    score += Self::score_window(own, opponent, empty);
                }
            }
        }

        score.clamp(1 - WIN_SCORE, WIN_SCORE - 1)
    }
}
