use std::collections::HashMap;
use std::hash::Hash;

use crate::interface::Score;

use super::MIN_HASH_DEPTH;

/// Memoizes scores of the recursive search steps during one root search.
pub trait ScoreCache<K> {
    /// Forget everything and prepare for a root search `depth` plies deep.
    fn reset(&mut self, _depth: i32) {}

    /// Whether scores at this remaining depth go through the cache.
    fn covers(&self, depth: i32) -> bool;

    fn probe(&mut self, depth: i32, key: &K) -> Option<Score>;

    fn store(&mut self, depth: i32, key: K, score: Score);
}

/// Caches nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<K> ScoreCache<K> for NoCache {
    fn covers(&self, _depth: i32) -> bool {
        false
    }

    fn probe(&mut self, _depth: i32, _key: &K) -> Option<Score> {
        None
    }

    fn store(&mut self, _depth: i32, _key: K, _score: Score) {}
}

/// One map from board key to score per remaining depth.
///
/// Stores whatever the step returned under the window it was searched with.
/// A score cut off by a narrow window is a bound, not the exact value, and a
/// later probe under a wider window gets that bound back as if it were exact.
pub struct DepthCache<K> {
    slots: Vec<HashMap<K, Score>>,
    min_depth: i32,
    hits: u64,
}

impl<K> DepthCache<K> {
    pub fn new(min_depth: i32) -> Self {
        Self {
            slots: Vec::new(),
            min_depth,
            hits: 0,
        }
    }

    /// Probes answered since the last reset.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Stored scores over all depths.
    pub fn len(&self) -> usize {
        self.slots.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for DepthCache<K> {
    fn default() -> Self {
        Self::new(MIN_HASH_DEPTH)
    }
}

impl<K: Eq + Hash> ScoreCache<K> for DepthCache<K> {
    fn reset(&mut self, depth: i32) {
        self.slots.clear();
        self.slots.resize_with(depth.max(0) as usize + 1, HashMap::new);
        self.hits = 0;
    }

    fn covers(&self, depth: i32) -> bool {
        depth >= self.min_depth && depth >= 0 && (depth as usize) < self.slots.len()
    }

    fn probe(&mut self, depth: i32, key: &K) -> Option<Score> {
        let score = self.slots.get(depth as usize)?.get(key).copied();
        if score.is_some() {
            self.hits += 1;
        }
        score
    }

    fn store(&mut self, depth: i32, key: K, score: Score) {
        if let Some(slot) = self.slots.get_mut(depth as usize) {
            slot.entry(key).or_insert(score);
        }
    }
}
