//! Time-bounded alpha-beta search.
//!
//! The search is assembled from small parts:
//!
//! - [`AlphaBeta`](alphabeta::AlphaBeta) runs the root and the recursive
//!   min/max steps.
//! - A [`MoveOrder`](ordering::MoveOrder) decides in which order columns are
//!   tried, optionally shuffled before every root decision.
//! - A [`ScoreCache`](cache::ScoreCache) memoizes scores per remaining depth
//!   for the duration of one root search.
//! - [`IterativeDeepening`](driver::IterativeDeepening) and
//!   [`FixedDepth`](driver::FixedDepth) turn a root search into a
//!   [`Player`](crate::interface::Player).

pub mod alphabeta;
pub mod cache;
pub mod driver;
pub mod options;
pub mod ordering;

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::interface::{Board, Color, Score};

/// Lower bound sentinel, comfortably below any reachable score.
pub const ALPHA_INIT: Score = -0x0FFF_FFF0;
/// Upper bound sentinel, comfortably above any reachable score.
pub const BETA_INIT: Score = 0x0FFF_FFF0;

/// Center-out column preference of a 7 column board.
pub const POSITION_ORDER: [usize; 7] = [3, 2, 4, 5, 1, 0, 6];

/// Probability of swapping each adjacent pair of the position order.
pub const RANDOMNESS: f64 = 0.3;

/// Shallowest remaining depth whose scores are cached.
pub const MIN_HASH_DEPTH: i32 = 0;

/// Share of the timeout spent searching, the rest is left for unwinding.
pub const SAFETY_FACTOR: f64 = 0.95;

pub const DEFAULT_FIXED_DEPTH: i32 = 6;

/// Deepest root search. No board packed into 64 bits has more empty cells,
/// so deeper requests are clamped to it.
pub const MAX_SEARCH_DEPTH: i32 = 64;

/// Move returned when not even depth 0 finished in time.
/// It is not checked for legality.
pub const FALLBACK_MOVE: usize = 0;

/// The deadline passed while a search was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search deadline exceeded")]
pub struct Cancelled;

/// Point in time after which a running search gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn never() -> Self {
        Self(None)
    }

    /// Expires `budget` from now. Budgets too large to represent never expire.
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now().checked_add(budget))
    }

    /// Deadline of a move with the given timeout, scaled by [`SAFETY_FACTOR`].
    pub fn for_timeout(timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => Self::after(timeout.mul_f64(SAFETY_FACTOR)),
            None => Self::never(),
        }
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Outcome of a completed root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootResult {
    /// `None` if no column could be played.
    pub best_move: Option<usize>,
    /// Score of `best_move`, [`ALPHA_INIT`] when there is none.
    pub score: Score,
}

/// A depth-bounded search that can be cut short by a deadline.
pub trait RootSearch<B: Board> {
    /// The side the search plays for.
    fn color(&self) -> Color;

    /// Search `board` `depth` plies deep and pick the best column.
    fn search_root(
        &mut self,
        board: &B,
        depth: i32,
        deadline: &Deadline,
    ) -> Result<RootResult, Cancelled>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines() {
        assert!(!Deadline::never().expired());
        assert!(Deadline::after(Duration::ZERO).expired());
        assert!(Deadline::for_timeout(Some(Duration::ZERO)).expired());
        assert!(!Deadline::for_timeout(Some(Duration::from_secs(3600))).expired());
        assert!(!Deadline::for_timeout(None).expired());
        assert!(!Deadline::after(Duration::MAX).expired());
    }
}
