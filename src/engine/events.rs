use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::model::{ActionConfig, Condition, NodeId};

/// Notifications produced while running a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    TriggerFired {
        node_id: NodeId,
        asset: String,
        condition: Condition,
        threshold: f64,
        price_at_fire: f64,
        timestamp: DateTime<Utc>,
    },
    ActionExecuted {
        action_id: NodeId,
        trigger_id: NodeId,
        config: ActionConfig,
        trigger_price: f64,
        timestamp: DateTime<Utc>,
    },
    /// A per-node failure. The rest of the tick carried on.
    Error {
        node_id: Option<NodeId>,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// Receiver of engine notifications (toasts, logs, channels).
pub trait EventSink {
    fn emit(&mut self, event: EngineEvent);
}

impl EventSink for Vec<EngineEvent> {
    fn emit(&mut self, event: EngineEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: EngineEvent) {
        (**self).emit(event);
    }
}

/// Forwards events to another task. Events are dropped once the receiver is gone.
impl EventSink for mpsc::UnboundedSender<EngineEvent> {
    fn emit(&mut self, event: EngineEvent) {
        let _ = self.send(event);
    }
}

/// Renders every event as a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TriggerFired {
                node_id,
                asset,
                condition,
                threshold,
                price_at_fire,
                ..
            } => info!(
                trigger = %node_id,
                "{asset} {condition} {threshold}: triggered at ${price_at_fire:.2}"
            ),
            EngineEvent::ActionExecuted {
                action_id,
                trigger_id,
                config,
                trigger_price,
                ..
            } => info!(
                action = %action_id,
                trigger = %trigger_id,
                "executing {:?} {} ${} {}x on {} at ${trigger_price:.2}",
                config.position,
                config.pair,
                config.amount_usd,
                config.leverage,
                config.exchange.name(),
            ),
            EngineEvent::Error {
                node_id, message, ..
            } => error!(node = node_id.as_deref().unwrap_or("-"), "{message}"),
        }
    }
}
