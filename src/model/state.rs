use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Runtime state of a trigger, written only by the engine.
///
/// `None` fields serialize as explicit `null` so a restored snapshot resumes
/// crossing evaluation exactly where it stopped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TriggerState {
    /// Price seen on the last tick this trigger was evaluated.
    pub last_observed_price: Option<f64>,
    /// Whether the condition held on the last evaluated tick.
    pub fired: bool,
    /// When the trigger last fired.
    pub fired_at: Option<DateTime<Utc>>,
}

impl TriggerState {
    /// State after evaluating one tick at `price`.
    /// The observed price is recorded whether or not the trigger fired.
    pub fn advance(&self, price: f64, fired: bool, now: DateTime<Utc>) -> TriggerState {
        TriggerState {
            last_observed_price: Some(price),
            fired,
            fired_at: if fired { Some(now) } else { self.fired_at },
        }
    }
}

/// Runtime state of an action, written only by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ActionState {
    pub last_executed_at: Option<DateTime<Utc>>,
    /// Price of the trigger that caused the last execution.
    pub last_trigger_price: Option<f64>,
}

impl ActionState {
    pub fn executed(trigger_price: f64, now: DateTime<Utc>) -> ActionState {
        ActionState {
            last_executed_at: Some(now),
            last_trigger_price: Some(trigger_price),
        }
    }
}
