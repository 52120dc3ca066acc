use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::{ActionConfig, ActionState, Node, NodeId};

use super::Engine;
use super::events::{EngineEvent, EventSink};

/// One action execution handed to the notification layer.
/// No order is placed anywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub action_id: NodeId,
    pub trigger_id: NodeId,
    pub config: ActionConfig,
    pub trigger_price: f64,
    pub executed_at: DateTime<Utc>,
}

impl Engine {
    /// Execute every action wired to a fired trigger.
    ///
    /// Actions are dispatched once per fired incoming edge: an action wired to
    /// two triggers that both fired this tick executes twice, and a trigger
    /// firing on consecutive ticks re-executes its actions each time.
    /// Edges whose target is missing or is not an action are skipped.
    ///
    /// `trigger_price` resolves the price that fired each trigger; a trigger
    /// without a price is reported as an error and dispatches nothing.
    pub fn dispatch<F>(
        &mut self,
        fired: &[NodeId],
        trigger_price: F,
        now: DateTime<Utc>,
        sink: &mut dyn EventSink,
    ) -> Vec<ExecutionRecord>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut records = Vec::new();

        for trigger_id in fired {
            let Some(price) = trigger_price(trigger_id.as_str()) else {
                sink.emit(EngineEvent::Error {
                    node_id: Some(trigger_id.clone()),
                    message: "no trigger price available for dispatch".to_string(),
                    timestamp: now,
                });
                continue;
            };

            let targets: Vec<NodeId> = self
                .store
                .outgoing(trigger_id)
                .map(|e| e.target.clone())
                .collect();

            for target in targets {
                let config = match self.store.get(&target) {
                    Some(Node::Action { config, .. }) => config.clone(),
                    Some(other) => {
                        debug!(
                            "skipping edge {trigger_id} -> {target}: target is a {}",
                            other.category()
                        );
                        continue;
                    }
                    None => {
                        debug!("skipping edge {trigger_id} -> {target}: target does not exist");
                        continue;
                    }
                };

                self.store.update(&target, |node| {
                    node.with_action_state(ActionState::executed(price, now))
                });

                sink.emit(EngineEvent::ActionExecuted {
                    action_id: target.clone(),
                    trigger_id: trigger_id.clone(),
                    config: config.clone(),
                    trigger_price: price,
                    timestamp: now,
                });
                records.push(ExecutionRecord {
                    action_id: target,
                    trigger_id: trigger_id.clone(),
                    config,
                    trigger_price: price,
                    executed_at: now,
                });
            }
        }

        records
    }
}
