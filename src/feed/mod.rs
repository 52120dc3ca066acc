pub mod random_walk;
pub mod scripted;

use std::collections::HashMap;

pub use random_walk::RandomWalkFeed;
pub use scripted::ScriptedFeed;

/// One tick's observations: asset symbol -> price in USD.
/// Symbols without a feed yet are simply absent.
pub type PriceMap = HashMap<String, f64>;

/// Assets the editor offers, as (symbol, name).
pub const DEFAULT_ASSETS: [(&str, &str); 8] = [
    ("SOL", "Solana"),
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("BNB", "Binance Coin"),
    ("ADA", "Cardano"),
    ("XRP", "Ripple"),
    ("DOT", "Polkadot"),
    ("DOGE", "Dogecoin"),
];

/// Source of price batches, one per tick.
pub trait PriceFeed: Send {
    /// Prices for the next tick, or `None` once the feed is exhausted.
    fn next_tick(&mut self) -> Option<PriceMap>;
}

impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    fn next_tick(&mut self) -> Option<PriceMap> {
        (**self).next_tick()
    }
}

/// Build a price map from `(symbol, price)` pairs.
pub fn prices<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> PriceMap {
    pairs
        .into_iter()
        .map(|(symbol, price)| (symbol.to_string(), price))
        .collect()
}
