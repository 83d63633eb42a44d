use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ConfigError;
use crate::interface::{Board, Color, Evaluator, Player};

use super::alphabeta::AlphaBeta;
use super::driver::{FixedDepth, IterativeDeepening};
use super::ordering::{FixedOrder, MoveOrder, RandomizedOrder};
use super::{RootSearch, MAX_SEARCH_DEPTH, MIN_HASH_DEPTH, POSITION_ORDER, RANDOMNESS};

/// Options for a searching player.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    timeout: Option<Duration>,
    fixed_depth: Option<i32>,
    max_depth: Option<i32>,
    position_order: Vec<usize>,
    // None disables the randomizer.
    randomness: Option<f64>,
    // None disables the cache.
    min_cache_depth: Option<i32>,
    // None seeds from the OS.
    seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            fixed_depth: None,
            max_depth: None,
            position_order: POSITION_ORDER.to_vec(),
            randomness: Some(RANDOMNESS),
            min_cache_depth: Some(MIN_HASH_DEPTH),
            seed: None,
        }
    }
}

impl SearchOptions {
    /// Time allowed per move. Without one, iterative deepening runs until
    /// the board is full or the max depth is reached.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Search exactly `depth` plies per move and ignore the timeout.
    pub fn with_fixed_depth(mut self, depth: i32) -> Self {
        self.fixed_depth = Some(depth);
        self
    }

    /// Stop iterative deepening after this depth.
    pub fn with_max_depth(mut self, depth: i32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Columns in the order they are tried. Columns the board doesn't have are
    /// skipped like full ones.
    pub fn with_position_order(mut self, order: Vec<usize>) -> Self {
        self.position_order = order;
        self
    }

    /// Probability of swapping each adjacent pair of the position order
    /// before a decision.
    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = Some(randomness);
        self
    }

    /// Always try columns in the same order.
    pub fn deterministic(mut self) -> Self {
        self.randomness = None;
        self
    }

    /// Cache scores of remaining depths of at least `depth`.
    pub fn with_min_cache_depth(mut self, depth: i32) -> Self {
        self.min_cache_depth = Some(depth);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.min_cache_depth = None;
        self
    }

    /// Seed of the randomizer, for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(randomness) = self.randomness {
            if !(0.0..=1.0).contains(&randomness) {
                return Err(ConfigError::Validation(format!(
                    "randomness must be within [0, 1], got {randomness}"
                )));
            }
        }
        let depths = [("fixed depth", self.fixed_depth), ("max depth", self.max_depth)];
        for (name, depth) in depths {
            if depth.is_some_and(|depth| !(0..=MAX_SEARCH_DEPTH).contains(&depth)) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within [0, {MAX_SEARCH_DEPTH}]"
                )));
            }
        }
        if self.position_order.is_empty() {
            return Err(ConfigError::Validation(
                "position order must not be empty".to_string(),
            ));
        }
        let mut sorted = self.position_order.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != self.position_order.len() {
            return Err(ConfigError::Validation(format!(
                "position order repeats a column: {:?}",
                self.position_order
            )));
        }
        Ok(())
    }

    /// Compose a player for `color` from these options.
    pub fn build_player<B, E>(
        &self,
        color: Color,
        evaluator: E,
    ) -> Result<Box<dyn Player<B> + Send>, ConfigError>
    where
        B: Board + 'static,
        B::Key: Send,
        E: Evaluator<B> + Send + 'static,
    {
        self.validate()?;
        let order: Box<dyn MoveOrder + Send> = match self.randomness {
            Some(randomness) => Box::new(self.randomized_order(randomness)),
            None => Box::new(FixedOrder::new(self.position_order.clone())),
        };
        let search = AlphaBeta::<B, E>::new(color, evaluator).with_order(order);
        let player = match self.min_cache_depth {
            Some(min_depth) => self.drive(search.cached(min_depth)),
            None => self.drive(search),
        };
        Ok(player)
    }

    fn randomized_order(&self, randomness: f64) -> RandomizedOrder<StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandomizedOrder::new(self.position_order.clone(), randomness, rng)
    }

    fn drive<B, S>(&self, search: S) -> Box<dyn Player<B> + Send>
    where
        B: Board + 'static,
        S: RootSearch<B> + Send + 'static,
    {
        match self.fixed_depth {
            Some(depth) => Box::new(FixedDepth::new(search, depth)),
            None => Box::new(
                IterativeDeepening::new(search, self.timeout).with_max_depth(self.max_depth),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::BitBoard;
    use crate::eval::{NeutralEvaluator, WindowEvaluator};

    #[test]
    fn test_validation() {
        assert!(SearchOptions::default().validate().is_ok());
        assert!(SearchOptions::default()
            .with_randomness(1.5)
            .validate()
            .is_err());
        assert!(SearchOptions::default()
            .with_fixed_depth(-1)
            .validate()
            .is_err());
        assert!(SearchOptions::default()
            .with_max_depth(MAX_SEARCH_DEPTH)
            .validate()
            .is_ok());
        assert!(SearchOptions::default()
            .with_max_depth(i32::MAX)
            .validate()
            .is_err());
        assert!(SearchOptions::default()
            .deterministic()
            .with_fixed_depth(2_000_000_000)
            .build_player::<BitBoard, _>(Color::Red, NeutralEvaluator)
            .is_err());
        assert!(SearchOptions::default()
            .with_position_order(vec![3, 3, 2])
            .validate()
            .is_err());
        assert!(SearchOptions::default()
            .with_position_order(vec![])
            .build_player::<BitBoard, _>(Color::Red, NeutralEvaluator)
            .is_err());
    }

    #[test]
    fn test_every_combination_plays() {
        let board = BitBoard::from_columns(&[3, 3, 4]).unwrap();
        let base = SearchOptions::default().with_fixed_depth(3).with_seed(5);
        let variants = [
            base.clone(),
            base.clone().without_cache(),
            base.clone().deterministic(),
            base.clone().deterministic().without_cache(),
        ];
        for options in variants {
            let mut player = options
                .build_player::<BitBoard, _>(Color::Yellow, WindowEvaluator)
                .unwrap();
            assert_eq!(player.color(), Color::Yellow);
            assert_eq!(player.name(), "FixedDepth(3)");
            let column = player.next_move(&board).unwrap();
            assert!(column.is_some_and(|c| board.is_legal(c)), "{options:?}");
        }
    }

    #[test]
    fn test_iterative_player_by_default() {
        let options = SearchOptions::default()
            .with_timeout(Duration::from_millis(200))
            .with_seed(1);
        assert_eq!(options.timeout(), Some(Duration::from_millis(200)));
        let mut player = options
            .build_player::<BitBoard, _>(Color::Red, WindowEvaluator)
            .unwrap();
        assert_eq!(player.name(), "IterativeDeepening");
        let column = player.next_move(&BitBoard::standard()).unwrap();
        assert!(column.is_some_and(|c| c < 7));
    }

    #[test]
    fn test_custom_order_reaches_wide_boards() {
        // Column 8 is outside the default order.
        let mut board = BitBoard::new(4, 9).unwrap();
        for _ in 0..3 {
            board.place_stone(8, Color::Red);
        }
        board.place_stone(0, Color::Yellow);
        board.place_stone(1, Color::Yellow);
        board.place_stone(2, Color::Yellow);
        let options = SearchOptions::default()
            .deterministic()
            .with_fixed_depth(2)
            .with_position_order((0..9).rev().collect());
        let mut player = options
            .build_player::<BitBoard, _>(Color::Red, NeutralEvaluator)
            .unwrap();
        assert_eq!(player.next_move(&board).unwrap(), Some(8));
    }
}
