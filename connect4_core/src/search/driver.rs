use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::PlayError;
use crate::interface::{Board, Color, Player};

use super::{Cancelled, Deadline, RootResult, RootSearch, DEFAULT_FIXED_DEPTH, FALLBACK_MOVE};

/// Searches one ply deeper at a time until the timeout runs out, and plays
/// the move of the deepest search that finished.
pub struct IterativeDeepening<S> {
    search: S,
    timeout: Option<Duration>,
    max_depth: Option<i32>,
    last: Option<(i32, RootResult)>,
}

impl<S> IterativeDeepening<S> {
    /// Without a timeout the search deepens until the board is full.
    pub fn new(search: S, timeout: Option<Duration>) -> Self {
        Self {
            search,
            timeout,
            max_depth: None,
            last: None,
        }
    }

    /// Stop deepening after `max_depth`, even with time left.
    pub fn with_max_depth(mut self, max_depth: Option<i32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// Deepest finished depth of the last move and its result.
    pub fn last_result(&self) -> Option<(i32, RootResult)> {
        self.last
    }

    pub fn choose_move<B: Board>(&mut self, board: &B) -> Option<usize>
    where
        S: RootSearch<B>,
    {
        let started = Instant::now();
        let deadline = Deadline::for_timeout(self.timeout);
        let mut limit = (board.rows() * board.columns()) as i32;
        if let Some(max_depth) = self.max_depth {
            limit = limit.min(max_depth.saturating_add(1));
        }

        self.last = None;
        let mut best_move = Some(FALLBACK_MOVE);
        for depth in 0..limit {
            match self.search.search_root(board, depth, &deadline) {
                Ok(result) => {
                    debug!(
                        depth,
                        best_move = ?result.best_move,
                        score = result.score,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "depth finished"
                    );
                    best_move = result.best_move;
                    self.last = Some((depth, result));
                    if best_move.is_none() {
                        break;
                    }
                }
                Err(Cancelled) => {
                    debug!(depth, "out of time");
                    break;
                }
            }
        }

        debug!(
            color = ?self.search.color(),
            best_move = ?best_move,
            depth = ?self.last.map(|(depth, _)| depth),
            "move chosen"
        );
        best_move
    }
}

impl<B: Board, S: RootSearch<B>> Player<B> for IterativeDeepening<S> {
    fn color(&self) -> Color {
        self.search.color()
    }

    fn next_move(&mut self, board: &B) -> Result<Option<usize>, PlayError> {
        Ok(self.choose_move(board))
    }

    fn name(&self) -> String {
        "IterativeDeepening".to_string()
    }
}

/// Always searches exactly `depth` plies, however long it takes.
/// Useful when results must not depend on timing.
pub struct FixedDepth<S> {
    search: S,
    depth: i32,
    last: Option<RootResult>,
}

impl<S> FixedDepth<S> {
    pub fn new(search: S, depth: i32) -> Self {
        Self {
            search,
            depth,
            last: None,
        }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn last_result(&self) -> Option<RootResult> {
        self.last
    }

    pub fn choose_move<B: Board>(&mut self, board: &B) -> Option<usize>
    where
        S: RootSearch<B>,
    {
        match self.search.search_root(board, self.depth, &Deadline::never()) {
            Ok(result) => {
                debug!(
                    depth = self.depth,
                    best_move = ?result.best_move,
                    score = result.score,
                    "move chosen"
                );
                self.last = Some(result);
                result.best_move
            }
            // unreachable without a deadline
            Err(Cancelled) => Some(FALLBACK_MOVE),
        }
    }
}

impl<S> From<S> for FixedDepth<S> {
    fn from(search: S) -> Self {
        Self::new(search, DEFAULT_FIXED_DEPTH)
    }
}

impl<B: Board, S: RootSearch<B>> Player<B> for FixedDepth<S> {
    fn color(&self) -> Color {
        self.search.color()
    }

    fn next_move(&mut self, board: &B) -> Result<Option<usize>, PlayError> {
        Ok(self.choose_move(board))
    }

    fn name(&self) -> String {
        format!("FixedDepth({})", self.depth)
    }
}
