use rand::Rng;

use super::POSITION_ORDER;

/// Order in which columns are tried at every node of a search.
pub trait MoveOrder {
    /// Called once before every root decision.
    fn prepare(&mut self) {}

    fn columns(&self) -> &[usize];
}

/// The same order for every decision.
#[derive(Debug, Clone)]
pub struct FixedOrder(Vec<usize>);

impl FixedOrder {
    pub fn new(order: Vec<usize>) -> Self {
        Self(order)
    }
}

impl Default for FixedOrder {
    fn default() -> Self {
        Self(POSITION_ORDER.to_vec())
    }
}

impl<O: MoveOrder + ?Sized> MoveOrder for Box<O> {
    fn prepare(&mut self) {
        (**self).prepare();
    }

    fn columns(&self) -> &[usize] {
        (**self).columns()
    }
}

impl MoveOrder for FixedOrder {
    fn columns(&self) -> &[usize] {
        &self.0
    }
}

/// Perturbs a base order before every root decision, so that repeated games
/// don't replay the same center-first line while the bias survives on average.
pub struct RandomizedOrder<R> {
    base: Vec<usize>,
    working: Vec<usize>,
    randomness: f64,
    rng: R,
}

impl<R: Rng> RandomizedOrder<R> {
    pub fn new(base: Vec<usize>, randomness: f64, rng: R) -> Self {
        Self {
            working: base.clone(),
            base,
            randomness,
            rng,
        }
    }
}

impl<R: Rng> MoveOrder for RandomizedOrder<R> {
    fn prepare(&mut self) {
        self.working.copy_from_slice(&self.base);
        // Swaps apply in sequence, so a column can travel several slots.
        for i in 0..self.base.len().saturating_sub(1) {
            if self.rng.gen::<f64>() < self.randomness {
                self.working.swap(i, i + 1);
            }
        }
    }

    fn columns(&self) -> &[usize] {
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::RANDOMNESS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> RandomizedOrder<StdRng> {
        RandomizedOrder::new(
            POSITION_ORDER.to_vec(),
            RANDOMNESS,
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_fixed_order_never_changes() {
        let mut order = FixedOrder::default();
        order.prepare();
        assert_eq!(order.columns(), &POSITION_ORDER);
    }

    #[test]
    fn test_extreme_randomness() {
        let mut never =
            RandomizedOrder::new(POSITION_ORDER.to_vec(), 0.0, StdRng::seed_from_u64(1));
        never.prepare();
        assert_eq!(never.columns(), &POSITION_ORDER);

        let mut always =
            RandomizedOrder::new(POSITION_ORDER.to_vec(), 1.0, StdRng::seed_from_u64(1));
        always.prepare();
        // the first column bubbles all the way to the back
        assert_eq!(always.columns(), &[2, 4, 5, 1, 0, 6, 3]);
        // every decision restarts from the base order
        always.prepare();
        assert_eq!(always.columns(), &[2, 4, 5, 1, 0, 6, 3]);
    }

    #[test]
    fn test_order_stays_a_permutation() {
        let mut order = seeded(7);
        let mut moved = false;
        for _ in 0..200 {
            order.prepare();
            let mut sorted = order.columns().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6]);
            moved |= order.columns() != POSITION_ORDER;
        }
        assert!(moved);
    }

    #[test]
    fn test_same_seed_same_orders() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..50 {
            a.prepare();
            b.prepare();
            assert_eq!(a.columns(), b.columns());
        }
    }
}
