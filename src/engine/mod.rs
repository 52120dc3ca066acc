pub mod clock;
pub mod condition;
pub mod dispatch;
pub mod events;
pub mod store;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::feed::PriceMap;
use crate::model::{Graph, Node, NodeId, TriggerState};
use crate::validate::{self, ValidationError};

pub use dispatch::ExecutionRecord;
use events::{EngineEvent, EventSink};
use store::GraphStore;

/// A trigger whose condition held on this tick, with the price that fired it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredTrigger {
    pub node_id: NodeId,
    pub price: f64,
}

/// Outcome of one full tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub fired: Vec<FiredTrigger>,
    pub executed: Vec<ExecutionRecord>,
}

/// Trigger evaluation and action dispatch over a graph.
///
/// The engine only reads node configuration and only writes runtime state;
/// it never adds or removes nodes or edges. Each tick runs to completion
/// before returning, so callers serialize ticks simply by holding `&mut`.
pub struct Engine {
    store: GraphStore,
}

impl Engine {
    /// Validate a snapshot and load it. Configuration errors are fatal here,
    /// never at tick time.
    pub fn new(graph: Graph) -> Result<Self, Vec<ValidationError>> {
        validate::validate(&graph)?;
        let store = GraphStore::from_graph(graph).map_err(|e| vec![ValidationError::from(e)])?;
        Ok(Engine { store })
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Mutable access for the editing collaborator (insert, connect, clear).
    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    pub fn snapshot(&self) -> Graph {
        self.store.snapshot()
    }

    /// Evaluate every trigger once against `prices`.
    ///
    /// Triggers whose asset is missing from `prices` are skipped with no state
    /// change. Every evaluated trigger records the observed price *after*
    /// evaluation, so crossing conditions compare against the previous tick.
    /// All new states are computed first and committed together: no trigger
    /// observes another trigger's update within the same tick.
    ///
    /// Returns fired triggers in graph order, without duplicates.
    pub fn evaluate_tick(
        &mut self,
        prices: &PriceMap,
        now: DateTime<Utc>,
        sink: &mut dyn EventSink,
    ) -> Vec<FiredTrigger> {
        let mut updates: Vec<(NodeId, TriggerState)> = Vec::new();
        let mut fired = Vec::new();

        for node in self.store.nodes() {
            let Node::Trigger {
                id,
                config,
                runtime_state,
                ..
            } = node
            else {
                continue;
            };

            let Some(&price) = prices.get(&config.asset) else {
                debug!(trigger = %id, "no price for {} this tick", config.asset);
                continue;
            };

            if !price.is_finite() || price < 0.0 {
                sink.emit(EngineEvent::Error {
                    node_id: Some(id.clone()),
                    message: format!("feed reported invalid price {price} for {}", config.asset),
                    timestamp: now,
                });
                continue;
            }

            let hit = condition::evaluate(
                runtime_state.last_observed_price,
                price,
                config.condition,
                config.threshold,
            );

            if hit {
                sink.emit(EngineEvent::TriggerFired {
                    node_id: id.clone(),
                    asset: config.asset.clone(),
                    condition: config.condition,
                    threshold: config.threshold,
                    price_at_fire: price,
                    timestamp: now,
                });
                fired.push(FiredTrigger {
                    node_id: id.clone(),
                    price,
                });
            }

            updates.push((id.clone(), runtime_state.advance(price, hit, now)));
        }

        for (id, state) in updates {
            self.store.update(&id, |node| node.with_trigger_state(state));
        }

        fired
    }

    /// Run one tick: evaluate all triggers, then dispatch the fired ones.
    pub fn tick(
        &mut self,
        prices: &PriceMap,
        now: DateTime<Utc>,
        sink: &mut dyn EventSink,
    ) -> TickReport {
        let fired = self.evaluate_tick(prices, now, sink);

        let fired_prices: HashMap<&str, f64> = fired
            .iter()
            .map(|f| (f.node_id.as_str(), f.price))
            .collect();
        let fired_ids: Vec<NodeId> = fired.iter().map(|f| f.node_id.clone()).collect();

        let executed = self.dispatch(
            &fired_ids,
            |id| fired_prices.get(id).copied(),
            now,
            sink,
        );

        TickReport { fired, executed }
    }
}
