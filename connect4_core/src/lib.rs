pub mod arena;
mod bitboard;
pub mod error;
mod eval;
mod human;
pub mod interface;
pub mod search;

pub use arena::{play_game, play_series, GameResult, Outcome, SeriesSummary};
pub use bitboard::{BitBoard, BoardKey, STANDARD_COLUMNS, STANDARD_ROWS};
pub use error::{ArenaError, ConfigError, PlayError};
pub use eval::{NeutralEvaluator, WindowEvaluator};
pub use human::{HumanPlayer, EXIT_COMMAND};
pub use interface::{Board, Color, Evaluator, Player, Score, WIN_SCORE};
pub use search::alphabeta::AlphaBeta;
pub use search::driver::{FixedDepth, IterativeDeepening};
pub use search::options::SearchOptions;
pub use search::{Deadline, RootResult, RootSearch};
