use crate::model::{
    ActionConfig, ActionKind, Condition, Edge, Exchange, Graph, Node, PositionSide,
    TriggerConfig, TriggerKind,
};

/// A small graph: SOL breakout goes long, BTC weakness goes short.
pub fn example_graph() -> anyhow::Result<Graph> {
    let nodes = vec![
        Node::trigger(
            "price_threshold-1",
            TriggerKind::PriceThreshold,
            TriggerConfig::new("SOL", Condition::CrossesAbove, 100.0)?,
        )
        .with_label("SOL breakout")
        .with_position(100.0, 100.0),
        Node::action(
            "long_position-1",
            ActionKind::LongPosition,
            ActionConfig::new(Exchange::Binance, "SOLUSDT", PositionSide::Long, 250.0, 5)?,
        )
        .with_label("Long SOL 5x")
        .with_position(450.0, 100.0),
        Node::trigger(
            "price_threshold-2",
            TriggerKind::PriceThreshold,
            TriggerConfig::new("BTC", Condition::Below, 90.0)?,
        )
        .with_label("BTC under 90")
        .with_position(100.0, 220.0),
        Node::action(
            "short_position-1",
            ActionKind::ShortPosition,
            ActionConfig::new(Exchange::Bybit, "BTCUSDT", PositionSide::Short, 100.0, 10)?,
        )
        .with_label("Short BTC 10x")
        .with_position(450.0, 220.0),
    ];

    let edges = vec![
        Edge::new("price_threshold-1", "long_position-1"),
        Edge::new("price_threshold-2", "short_position-1"),
    ];

    Ok(Graph::new(nodes, edges))
}

/// Print an example graph JSON to stdout.
pub fn run() -> anyhow::Result<()> {
    let graph = example_graph()?;
    println!("{}", graph.to_json()?);
    Ok(())
}
