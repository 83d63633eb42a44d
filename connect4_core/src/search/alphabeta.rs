use std::marker::PhantomData;

use rand::Rng;

use crate::interface::{Board, Color, Evaluator, Score, WIN_SCORE};

use super::cache::{DepthCache, NoCache, ScoreCache};
use super::ordering::{FixedOrder, MoveOrder, RandomizedOrder};
use super::{
    Cancelled, Deadline, RootResult, RootSearch, ALPHA_INIT, BETA_INIT, MAX_SEARCH_DEPTH,
};

#[derive(Clone, Copy)]
enum Step {
    Min,
    Max,
}

/// Minimax with alpha-beta pruning, searching for `color`.
///
/// Move order and caching are parts picked at construction:
///
/// ```
/// use connect4_core::{AlphaBeta, BitBoard, Color, NeutralEvaluator};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let search = AlphaBeta::<BitBoard, _>::new(Color::Red, NeutralEvaluator)
///     .randomized(0.3, StdRng::seed_from_u64(0))
///     .cached(0);
/// # let _ = search;
/// ```
pub struct AlphaBeta<B: Board, E, O = FixedOrder, C = NoCache> {
    color: Color,
    evaluator: E,
    order: O,
    cache: C,
    nodes: u64,
    _board: PhantomData<fn(&B)>,
}

impl<B: Board, E: Evaluator<B>> AlphaBeta<B, E> {
    pub fn new(color: Color, evaluator: E) -> Self {
        Self {
            color,
            evaluator,
            order: FixedOrder::default(),
            cache: NoCache,
            nodes: 0,
            _board: PhantomData,
        }
    }
}

impl<B: Board, E, O, C> AlphaBeta<B, E, O, C> {
    fn map_parts<O2, C2>(self, parts: impl FnOnce(O, C) -> (O2, C2)) -> AlphaBeta<B, E, O2, C2> {
        let (order, cache) = parts(self.order, self.cache);
        AlphaBeta {
            color: self.color,
            evaluator: self.evaluator,
            order,
            cache,
            nodes: self.nodes,
            _board: PhantomData,
        }
    }

    pub fn with_order<O2: MoveOrder>(self, order: O2) -> AlphaBeta<B, E, O2, C> {
        self.map_parts(|_, cache| (order, cache))
    }

    /// Shuffle the default order before every root decision.
    pub fn randomized<R: Rng>(
        self,
        randomness: f64,
        rng: R,
    ) -> AlphaBeta<B, E, RandomizedOrder<R>, C> {
        self.with_order(RandomizedOrder::new(
            super::POSITION_ORDER.to_vec(),
            randomness,
            rng,
        ))
    }

    pub fn with_cache<C2: ScoreCache<B::Key>>(self, cache: C2) -> AlphaBeta<B, E, O, C2> {
        self.map_parts(|order, _| (order, cache))
    }

    /// Cache scores for remaining depths of at least `min_depth`.
    pub fn cached(self, min_depth: i32) -> AlphaBeta<B, E, O, DepthCache<B::Key>> {
        self.with_cache(DepthCache::new(min_depth))
    }

    /// Nodes visited by the last root search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<B, E, O, C> AlphaBeta<B, E, O, C>
where
    B: Board,
    E: Evaluator<B>,
    O: MoveOrder,
    C: ScoreCache<B::Key>,
{
    /// A min or max step, answered from the cache when possible.
    fn step(
        &mut self,
        step: Step,
        board: &B,
        depth: i32,
        alpha: Score,
        beta: Score,
        deadline: &Deadline,
    ) -> Result<Score, Cancelled> {
        let key = self.cache.covers(depth).then(|| board.key());
        if let Some(score) = key.as_ref().and_then(|key| self.cache.probe(depth, key)) {
            return Ok(score);
        }
        let score = match step {
            Step::Min => self.min(board, depth, alpha, beta, deadline)?,
            Step::Max => self.max(board, depth, alpha, beta, deadline)?,
        };
        if let Some(key) = key {
            self.cache.store(depth, key, score);
        }
        Ok(score)
    }

    /// The opponent picks the reply that is worst for us.
    fn min(
        &mut self,
        board: &B,
        depth: i32,
        alpha: Score,
        mut beta: Score,
        deadline: &Deadline,
    ) -> Result<Score, Cancelled> {
        self.nodes += 1;
        if board.has_won(self.color) {
            return Ok(WIN_SCORE * (depth + 1));
        }
        if deadline.expired() {
            return Err(Cancelled);
        }
        if depth <= 0 {
            return Ok(self.evaluator.score(board, self.color, depth));
        }

        let opponent = board.other_player(self.color);
        for i in 0..self.order.columns().len() {
            let column = self.order.columns()[i];
            let mut child = board.clone();
            if !child.place_stone(column, opponent) {
                continue;
            }
            let score = self.step(Step::Max, &child, depth - 1, alpha, beta, deadline)?;
            if score < beta {
                beta = score;
            }
            if alpha >= beta {
                // a sibling already guarantees us more than this
                return Ok(beta);
            }
        }
        Ok(beta)
    }

    /// We pick the reply that is best for us.
    fn max(
        &mut self,
        board: &B,
        depth: i32,
        mut alpha: Score,
        beta: Score,
        deadline: &Deadline,
    ) -> Result<Score, Cancelled> {
        self.nodes += 1;
        if board.has_won(board.other_player(self.color)) {
            return Ok(-WIN_SCORE * (depth + 1));
        }
        if deadline.expired() {
            return Err(Cancelled);
        }
        if depth <= 0 {
            return Ok(self.evaluator.score(board, self.color, depth));
        }

        for i in 0..self.order.columns().len() {
            let column = self.order.columns()[i];
            let mut child = board.clone();
            if !child.place_stone(column, self.color) {
                continue;
            }
            let score = self.step(Step::Min, &child, depth - 1, alpha, beta, deadline)?;
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                return Ok(alpha);
            }
        }
        Ok(alpha)
    }
}

impl<B, E, O, C> RootSearch<B> for AlphaBeta<B, E, O, C>
where
    B: Board,
    E: Evaluator<B>,
    O: MoveOrder,
    C: ScoreCache<B::Key>,
{
    fn color(&self) -> Color {
        self.color
    }

    fn search_root(
        &mut self,
        board: &B,
        depth: i32,
        deadline: &Deadline,
    ) -> Result<RootResult, Cancelled> {
        let depth = depth.min(MAX_SEARCH_DEPTH);
        self.order.prepare();
        self.cache.reset(depth);
        self.nodes = 0;

        let mut alpha = ALPHA_INIT;
        let beta = BETA_INIT;
        let mut best_move = None;

        for i in 0..self.order.columns().len() {
            let column = self.order.columns()[i];
            let mut child = board.clone();
            if !child.place_stone(column, self.color) {
                continue;
            }
            let score = self.step(Step::Min, &child, depth - 1, alpha, beta, deadline)?;
            // strict, so ties keep the column tried first
            if score > alpha {
                alpha = score;
                best_move = Some(column);
            }
        }

        Ok(RootResult {
            best_move,
            score: alpha,
        })
    }
}
