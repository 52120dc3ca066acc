use std::collections::VecDeque;

use super::{PriceFeed, PriceMap};

/// Replays a fixed sequence of price batches, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeed {
    ticks: VecDeque<PriceMap>,
}

impl ScriptedFeed {
    pub fn new(ticks: impl IntoIterator<Item = PriceMap>) -> Self {
        ScriptedFeed {
            ticks: ticks.into_iter().collect(),
        }
    }

    pub fn push(&mut self, tick: PriceMap) {
        self.ticks.push_back(tick);
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl PriceFeed for ScriptedFeed {
    fn next_tick(&mut self) -> Option<PriceMap> {
        self.ticks.pop_front()
    }
}
