use std::collections::HashMap;

use rand::prelude::*;

use super::{PriceFeed, PriceMap};

/// Upper bound of a symbol's first simulated price.
const INITIAL_PRICE_MAX: f64 = 200.0;
/// Largest absolute per-tick move.
const MAX_STEP: f64 = 5.0;

/// Simulated market: each symbol starts uniform in `[0, 200)` and then moves
/// by a uniform step in `[-5, 5)` per tick, floored at 0. Never exhausts.
pub struct RandomWalkFeed {
    symbols: Vec<String>,
    last: HashMap<String, f64>,
    rng: StdRng,
}

impl RandomWalkFeed {
    pub fn new(symbols: impl IntoIterator<Item = String>, seed: u64) -> Self {
        RandomWalkFeed {
            symbols: symbols.into_iter().collect(),
            last: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl PriceFeed for RandomWalkFeed {
    fn next_tick(&mut self) -> Option<PriceMap> {
        let mut tick = PriceMap::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let current = match self.last.get(symbol) {
                Some(&p) => p,
                None => self.rng.random_range(0.0..INITIAL_PRICE_MAX),
            };
            let change = self.rng.random_range(-MAX_STEP..MAX_STEP);
            let next = (current + change).max(0.0);
            self.last.insert(symbol.clone(), next);
            tick.insert(symbol.clone(), next);
        }
        Some(tick)
    }
}
