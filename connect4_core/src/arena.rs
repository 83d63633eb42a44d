//! Runs matches between players.

use std::fmt::Display;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{ArenaError, ConfigError, PlayError};
use crate::interface::{Board, Color, Player};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Color),
    Draw,
    /// `color` offered no move or an illegal one and lost.
    Forfeit { color: Color, column: Option<usize> },
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match *self {
            GameResult::Win(color) => Some(color),
            GameResult::Forfeit { color, .. } => Some(color.other()),
            GameResult::Draw => None,
        }
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Win(color) => write!(f, "{color:?} wins"),
            GameResult::Draw => write!(f, "Draw"),
            GameResult::Forfeit {
                color,
                column: Some(column),
            } => write!(f, "{color:?} forfeits with illegal column {column}"),
            GameResult::Forfeit {
                color,
                column: None,
            } => write!(f, "{color:?} forfeits without a move"),
        }
    }
}

/// The final state of a game.
#[derive(Debug, Clone)]
pub struct Outcome<B> {
    pub result: GameResult,
    pub board: B,
    /// Columns played, Red first.
    pub moves: Vec<usize>,
}

/// Plays one game on `board`, Red moving first.
pub fn play_game<B: Board>(
    red: &mut dyn Player<B>,
    yellow: &mut dyn Player<B>,
    mut board: B,
) -> Result<Outcome<B>, PlayError> {
    let mut moves = Vec::new();
    let mut color = Color::Red;
    let result = loop {
        if board.is_full() {
            break GameResult::Draw;
        }
        let player: &mut dyn Player<B> = match color {
            Color::Red => &mut *red,
            Color::Yellow => &mut *yellow,
        };
        let column = match player.next_move(&board)? {
            Some(column) if board.place_stone(column, color) => column,
            column => {
                warn!(player = %player.name(), ?color, ?column, "rejected move");
                break GameResult::Forfeit { color, column };
            }
        };
        moves.push(column);
        info!(player = %player.name(), ?color, column, "move played");
        if board.has_won(color) {
            break GameResult::Win(color);
        }
        color = color.other();
    };
    info!(%result, moves = moves.len(), "game over");
    Ok(Outcome {
        result,
        board,
        moves,
    })
}

/// Tally of a series of games.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSummary {
    pub red_wins: usize,
    pub yellow_wins: usize,
    pub draws: usize,
    /// Games decided by a forfeit, also counted as a win for the other side.
    pub forfeits: usize,
}

impl SeriesSummary {
    fn record(&mut self, result: &GameResult) {
        if let GameResult::Forfeit { .. } = result {
            self.forfeits += 1;
        }
        match result.winner() {
            Some(Color::Red) => self.red_wins += 1,
            Some(Color::Yellow) => self.yellow_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.red_wins + self.yellow_wins + self.draws
    }
}

impl Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} games: red {} / yellow {} / draws {} ({} forfeits)",
            self.games(),
            self.red_wins,
            self.yellow_wins,
            self.draws,
            self.forfeits
        )
    }
}

/// The red and the yellow player of one game.
pub type PlayerPair<B> = (Box<dyn Player<B> + Send>, Box<dyn Player<B> + Send>);

/// Plays `games` independent games from `board` on a pool of `threads`
/// (default: one per CPU). `factory` builds fresh players for every game index.
/// The first error from either the factory or a game is returned.
pub fn play_series<B, F>(
    games: usize,
    threads: Option<usize>,
    board: &B,
    factory: F,
) -> Result<SeriesSummary, ArenaError>
where
    B: Board + Send + Sync,
    F: Fn(usize) -> Result<PlayerPair<B>, ConfigError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or_else(num_cpus::get))
        .build()?;

    let results = pool.install(|| {
        (0..games)
            .into_par_iter()
            .map(|game| {
                let (mut red, mut yellow) = factory(game)?;
                play_game(red.as_mut(), yellow.as_mut(), board.clone())
                    .map(|outcome| outcome.result)
                    .map_err(|source| ArenaError::Play { game, source })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut summary = SeriesSummary::default();
    for result in &results {
        summary.record(result);
    }
    info!(%summary, "series finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::BitBoard;

    /// Plays a fixed list of columns, then gives up.
    struct Scripted {
        color: Color,
        columns: Vec<usize>,
    }

    impl Scripted {
        fn new(color: Color, columns: &[usize]) -> Self {
            Self {
                color,
                columns: columns.iter().rev().copied().collect(),
            }
        }
    }

    impl<B: Board> Player<B> for Scripted {
        fn color(&self) -> Color {
            self.color
        }

        fn next_move(&mut self, _board: &B) -> Result<Option<usize>, PlayError> {
            Ok(self.columns.pop())
        }

        fn name(&self) -> String {
            "Scripted".to_string()
        }
    }

    struct Quitter;

    impl<B: Board> Player<B> for Quitter {
        fn color(&self) -> Color {
            Color::Yellow
        }

        fn next_move(&mut self, _board: &B) -> Result<Option<usize>, PlayError> {
            Err(PlayError::Quit)
        }

        fn name(&self) -> String {
            "Quitter".to_string()
        }
    }

    #[test]
    fn test_vertical_win() {
        let mut red = Scripted::new(Color::Red, &[3, 3, 3, 3]);
        let mut yellow = Scripted::new(Color::Yellow, &[4, 4, 4]);
        let outcome = play_game(&mut red, &mut yellow, BitBoard::standard()).unwrap();
        assert_eq!(outcome.result, GameResult::Win(Color::Red));
        assert_eq!(outcome.moves, vec![3, 4, 3, 4, 3, 4, 3]);
        assert!(outcome.board.has_won(Color::Red));
    }

    #[test]
    fn test_illegal_and_missing_moves_forfeit() {
        let mut red = Scripted::new(Color::Red, &[9]);
        let mut yellow = Scripted::new(Color::Yellow, &[]);
        let outcome = play_game(&mut red, &mut yellow, BitBoard::standard()).unwrap();
        assert_eq!(
            outcome.result,
            GameResult::Forfeit {
                color: Color::Red,
                column: Some(9)
            }
        );
        assert_eq!(outcome.result.winner(), Some(Color::Yellow));

        let mut red = Scripted::new(Color::Red, &[0]);
        let mut yellow = Scripted::new(Color::Yellow, &[]);
        let outcome = play_game(&mut red, &mut yellow, BitBoard::standard()).unwrap();
        assert_eq!(
            outcome.result,
            GameResult::Forfeit {
                color: Color::Yellow,
                column: None
            }
        );
        assert_eq!(outcome.result.to_string(), "Yellow forfeits without a move");
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let board = BitBoard::new(2, 2).unwrap();
        let mut red = Scripted::new(Color::Red, &[0, 1]);
        let mut yellow = Scripted::new(Color::Yellow, &[0, 1]);
        let outcome = play_game(&mut red, &mut yellow, board).unwrap();
        assert_eq!(outcome.result, GameResult::Draw);
        assert_eq!(outcome.moves.len(), 4);
    }

    #[test]
    fn test_player_errors_abort_the_game() {
        let mut red = Scripted::new(Color::Red, &[3]);
        let mut yellow = Quitter;
        let err = play_game(&mut red, &mut yellow, BitBoard::standard()).unwrap_err();
        assert!(matches!(err, PlayError::Quit));
    }

    #[test]
    fn test_series_summary() {
        let summary = play_series(6, Some(2), &BitBoard::standard(), |game| {
            // even games: red stacks column 0, odd games: yellow has no move
            let red: Box<dyn Player<BitBoard> + Send> =
                Box::new(Scripted::new(Color::Red, &[0, 0, 0, 0]));
            let yellow: Box<dyn Player<BitBoard> + Send> = if game % 2 == 0 {
                Box::new(Scripted::new(Color::Yellow, &[1, 1, 1]))
            } else {
                Box::new(Scripted::new(Color::Yellow, &[]))
            };
            Ok((red, yellow))
        })
        .unwrap();
        assert_eq!(
            summary,
            SeriesSummary {
                red_wins: 6,
                yellow_wins: 0,
                draws: 0,
                forfeits: 3,
            }
        );
        assert_eq!(summary.games(), 6);
    }

    #[test]
    fn test_series_reports_the_failing_game() {
        let err = play_series(3, Some(1), &BitBoard::standard(), |game| {
            let red: Box<dyn Player<BitBoard> + Send> =
                Box::new(Scripted::new(Color::Red, &[0, 0, 0, 0]));
            let yellow: Box<dyn Player<BitBoard> + Send> = if game == 2 {
                Box::new(Quitter)
            } else {
                Box::new(Scripted::new(Color::Yellow, &[1, 1, 1]))
            };
            Ok((red, yellow))
        })
        .unwrap_err();
        assert!(matches!(err, ArenaError::Play { game: 2, .. }));
    }

    #[test]
    fn test_series_reports_setup_errors() {
        let err = play_series(2, Some(1), &BitBoard::standard(), |_| {
            Err(ConfigError::Validation("no players".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, ArenaError::Config(_)));
    }
}
