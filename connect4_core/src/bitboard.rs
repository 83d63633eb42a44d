use std::fmt::{Debug, Display};

use super::error::ConfigError;
use super::interface::{Board, Color};

pub const STANDARD_ROWS: usize = 6;
pub const STANDARD_COLUMNS: usize = 7;

/// Stones in a line needed to win.
const CONNECT: usize = 4;

/// Connect-Four board packed into two bitmasks.
///
/// Column `c` owns bits `c * (rows + 1) .. c * (rows + 1) + rows`, bottom row
/// first. The extra bit on top of every column is never set, so shifting a
/// mask never carries a line from one column into the next.
//   6  13  20  27  34  41  48     <- sentinel row
//   5  12  19  26  33  40  47
//  ...
//   0   7  14  21  28  35  42
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard {
    rows: u8,
    columns: u8,
    red: u64,
    yellow: u64,
    mask: u64,
    moves: u8,
    to_move: Color,
}

/// Cache key of a [`BitBoard`]: the stones of both sides and the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoardKey {
    pub red: u64,
    pub yellow: u64,
    pub to_move: Color,
}

impl BitBoard {
    pub fn new(rows: usize, columns: usize) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::Validation(format!(
                "board needs at least one row and one column, got {rows}x{columns}"
            )));
        }
        if (rows + 1) * columns > 64 {
            return Err(ConfigError::BoardTooLarge { rows, columns });
        }
        Ok(Self {
            rows: rows as u8,
            columns: columns as u8,
            red: 0,
            yellow: 0,
            mask: 0,
            moves: 0,
            to_move: Color::Red,
        })
    }

    /// The classic 7 columns by 6 rows board.
    pub fn standard() -> Self {
        Self {
            rows: STANDARD_ROWS as u8,
            columns: STANDARD_COLUMNS as u8,
            red: 0,
            yellow: 0,
            mask: 0,
            moves: 0,
            to_move: Color::Red,
        }
    }

    /// Replays `columns` on a standard board, alternating sides from Red.
    /// Returns `None` if any of the moves is illegal.
    pub fn from_columns(columns: &[usize]) -> Option<Self> {
        let mut board = Self::standard();
        for &column in columns {
            let color = board.to_move;
            if !board.place_stone(column, color) {
                return None;
            }
        }
        Some(board)
    }

    /// The side that did not place the last stone.
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn moves_played(&self) -> usize {
        self.moves as usize
    }

    #[inline]
    fn height(&self) -> usize {
        self.rows as usize + 1
    }

    #[inline]
    fn bottom(&self, column: usize) -> u64 {
        1 << (column * self.height())
    }

    #[inline]
    fn top(&self, column: usize) -> u64 {
        1 << (column * self.height() + self.rows as usize - 1)
    }

    #[inline]
    fn stones(&self, color: Color) -> u64 {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
        }
    }

    /// Whether `bits` contain `CONNECT` aligned stones in any direction.
    fn has_line(&self, bits: u64) -> bool {
        let height = self.height() as u32;
        // vertical, horizontal, and both diagonals
        [1, height, height - 1, height + 1]
            .into_iter()
            .any(|shift| {
                let mut run = bits;
                for _ in 1..CONNECT {
                    run &= run.checked_shr(shift).unwrap_or(0);
                }
                run != 0
            })
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board for BitBoard {
    type Key = BoardKey;

    fn rows(&self) -> usize {
        self.rows as usize
    }

    fn columns(&self) -> usize {
        self.columns as usize
    }

    fn is_legal(&self, column: usize) -> bool {
        column < self.columns as usize && self.mask & self.top(column) == 0
    }

    fn place_stone(&mut self, column: usize, color: Color) -> bool {
        if !self.is_legal(column) {
            return false;
        }
        // The carry of the addition lands on the lowest free cell of the column.
        let mask = self.mask | (self.mask + self.bottom(column));
        let stone = mask ^ self.mask;
        self.mask = mask;
        match color {
            Color::Red => self.red |= stone,
            Color::Yellow => self.yellow |= stone,
        }
        self.moves += 1;
        self.to_move = color.other();
        true
    }

    fn has_won(&self, color: Color) -> bool {
        self.has_line(self.stones(color))
    }

    fn cell(&self, row: usize, column: usize) -> Option<Color> {
        if row >= self.rows as usize || column >= self.columns as usize {
            return None;
        }
        let bit = 1 << (column * self.height() + row);
        if self.red & bit != 0 {
            Some(Color::Red)
        } else if self.yellow & bit != 0 {
            Some(Color::Yellow)
        } else {
            None
        }
    }

    fn key(&self) -> Self::Key {
        BoardKey {
            red: self.red,
            yellow: self.yellow,
            to_move: self.to_move,
        }
    }

    fn occupation_label(&self, color: Color) -> &'static str {
        match color {
            Color::Red => "X (red)",
            Color::Yellow => "O (yellow)",
        }
    }

    fn is_full(&self) -> bool {
        self.moves as usize == self.rows as usize * self.columns as usize
    }
}

impl Display for BitBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..self.rows()).rev() {
            for column in 0..self.columns() {
                let symbol = match self.cell(row, column) {
                    Some(Color::Red) => "X ",
                    Some(Color::Yellow) => "O ",
                    None => ". ",
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        for column in 0..self.columns() {
            write!(f, "{} ", column % 10)?;
        }
        writeln!(f)
    }
}

impl Debug for BitBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitBoard({}x{}, red={:#x}, yellow={:#x}, to_move={:?})",
            self.rows, self.columns, self.red, self.yellow, self.to_move
        )
    }
}
