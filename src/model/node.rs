use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{ActionState, TriggerState};

/// A unique identifier for a node within a graph.
pub type NodeId = String;

/// Highest leverage an action node may request.
pub const MAX_LEVERAGE: u32 = 125;

// ── Configuration errors ────────────────────────────────────────────

/// A node configuration that must be rejected when it is built, never at tick time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Unknown condition `{value}` (expected above, below, crosses_above or crosses_below)")]
    UnknownCondition { value: String },

    #[error("Trigger asset must not be empty")]
    EmptyAsset,

    #[error("Threshold must be a finite number > 0, got {value}")]
    InvalidThreshold { value: f64 },

    #[error("Action pair must not be empty")]
    EmptyPair,

    #[error("Amount must be a finite USD value > 0, got {value}")]
    InvalidAmount { value: f64 },

    #[error("Leverage must be between 1 and 125, got {value}")]
    InvalidLeverage { value: u32 },
}

// ── Catalog enums ───────────────────────────────────────────────────

/// Price condition a trigger evaluates every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Level: fires every tick the price is strictly above the threshold.
    Above,
    /// Level: fires every tick the price is strictly below the threshold.
    Below,
    /// Crossing: fires on the tick the price moves from at-or-below to above.
    CrossesAbove,
    /// Crossing: fires on the tick the price moves from at-or-above to below.
    CrossesBelow,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Above,
        Condition::Below,
        Condition::CrossesAbove,
        Condition::CrossesBelow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Above => "above",
            Condition::Below => "below",
            Condition::CrossesAbove => "crosses_above",
            Condition::CrossesBelow => "crosses_below",
        }
    }

    /// Crossing conditions depend on the previous tick's price.
    pub fn is_crossing(&self) -> bool {
        matches!(self, Condition::CrossesAbove | Condition::CrossesBelow)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownCondition {
                value: s.to_string(),
            })
    }
}

/// Catalog entry a trigger node was created from.
/// Every kind evaluates with the price-threshold semantics of [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    PriceThreshold,
    PriceChange,
    RsiSignal,
    VolumeSpike,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 4] = [
        TriggerKind::PriceThreshold,
        TriggerKind::PriceChange,
        TriggerKind::RsiSignal,
        TriggerKind::VolumeSpike,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TriggerKind::PriceThreshold => "price_threshold",
            TriggerKind::PriceChange => "price_change",
            TriggerKind::RsiSignal => "rsi_signal",
            TriggerKind::VolumeSpike => "volume_spike",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TriggerKind::PriceThreshold => "Price Threshold",
            TriggerKind::PriceChange => "Price Change",
            TriggerKind::RsiSignal => "RSI Signal",
            TriggerKind::VolumeSpike => "Volume Spike",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TriggerKind::PriceThreshold => "Trigger when price crosses threshold",
            TriggerKind::PriceChange => "Trigger on percentage price change",
            TriggerKind::RsiSignal => "Trigger on RSI conditions",
            TriggerKind::VolumeSpike => "Trigger on volume activity",
        }
    }
}

/// Catalog entry an action node was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    LongPosition,
    ShortPosition,
    ClosePosition,
    PlaceOrder,
    StopLoss,
    TakeProfit,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::LongPosition,
        ActionKind::ShortPosition,
        ActionKind::ClosePosition,
        ActionKind::PlaceOrder,
        ActionKind::StopLoss,
        ActionKind::TakeProfit,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ActionKind::LongPosition => "long_position",
            ActionKind::ShortPosition => "short_position",
            ActionKind::ClosePosition => "close_position",
            ActionKind::PlaceOrder => "place_order",
            ActionKind::StopLoss => "stop_loss",
            ActionKind::TakeProfit => "take_profit",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActionKind::LongPosition => "Open Long",
            ActionKind::ShortPosition => "Open Short",
            ActionKind::ClosePosition => "Close Position",
            ActionKind::PlaceOrder => "Limit Order",
            ActionKind::StopLoss => "Stop Loss",
            ActionKind::TakeProfit => "Take Profit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActionKind::LongPosition => "Buy/Long position",
            ActionKind::ShortPosition => "Sell/Short position",
            ActionKind::ClosePosition => "Close existing position",
            ActionKind::PlaceOrder => "Place limit order",
            ActionKind::StopLoss => "Set stop loss",
            ActionKind::TakeProfit => "Set take profit",
        }
    }
}

/// Exchanges an action can target. Nothing is ever sent to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Binance,
    Bybit,
    Okx,
    Kucoin,
}

impl Exchange {
    pub const ALL: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Bybit,
        Exchange::Okx,
        Exchange::Kucoin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Exchange::Binance => "Binance",
            Exchange::Bybit => "Bybit",
            Exchange::Okx => "OKX",
            Exchange::Kucoin => "KuCoin",
        }
    }
}

/// Trade direction of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

/// Node category discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trigger,
    Action,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Trigger => f.write_str("trigger"),
            Category::Action => f.write_str("action"),
        }
    }
}

/// Canvas coordinates. Carried through snapshots, never read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

// ── Configs ─────────────────────────────────────────────────────────

/// Trigger configuration. Immutable once the node exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TriggerConfig {
    /// Asset symbol looked up in each tick's price mapping, e.g. "SOL".
    pub asset: String,
    pub condition: Condition,
    /// Price level in USD. Must be > 0.
    pub threshold: f64,
}

impl TriggerConfig {
    pub fn new(
        asset: impl Into<String>,
        condition: Condition,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        let config = TriggerConfig {
            asset: asset.into(),
            condition,
            threshold,
        };
        config.check()?;
        Ok(config)
    }

    /// The form defaults of the editor: SOL above $100.
    pub fn default_for_editor() -> Self {
        TriggerConfig {
            asset: "SOL".to_string(),
            condition: Condition::Above,
            threshold: 100.0,
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.asset.trim().is_empty() {
            return Err(ConfigError::EmptyAsset);
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// Action configuration. Immutable once the node exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionConfig {
    pub exchange: Exchange,
    /// Trading pair as listed on the exchange, e.g. "SOLUSDT".
    pub pair: String,
    pub position: PositionSide,
    /// Notional size in USD. Must be > 0.
    pub amount_usd: f64,
    /// Integer leverage multiplier, 1..=125.
    pub leverage: u32,
}

impl ActionConfig {
    pub fn new(
        exchange: Exchange,
        pair: impl Into<String>,
        position: PositionSide,
        amount_usd: f64,
        leverage: u32,
    ) -> Result<Self, ConfigError> {
        let config = ActionConfig {
            exchange,
            pair: pair.into().trim().to_uppercase(),
            position,
            amount_usd,
            leverage,
        };
        config.check()?;
        Ok(config)
    }

    /// The form defaults of the editor: 10x long SOLUSDT for $100 on Binance.
    pub fn default_for_editor() -> Self {
        ActionConfig {
            exchange: Exchange::Binance,
            pair: "SOLUSDT".to_string(),
            position: PositionSide::Long,
            amount_usd: 100.0,
            leverage: 10,
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.pair.trim().is_empty() {
            return Err(ConfigError::EmptyPair);
        }
        if !self.amount_usd.is_finite() || self.amount_usd <= 0.0 {
            return Err(ConfigError::InvalidAmount {
                value: self.amount_usd,
            });
        }
        if self.leverage < 1 || self.leverage > MAX_LEVERAGE {
            return Err(ConfigError::InvalidLeverage {
                value: self.leverage,
            });
        }
        Ok(())
    }
}

// ── The main Node enum ──────────────────────────────────────────────

/// A graph node, discriminated by the "category" field in JSON.
///
/// Configuration fields are written by whoever builds the node; the engine
/// only ever replaces `runtime_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Node {
    /// Watches one asset's price and fires when its condition holds.
    Trigger {
        /// Unique identifier for this node.
        id: NodeId,
        /// Catalog entry this trigger was created from.
        kind: TriggerKind,
        /// Display name.
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        config: TriggerConfig,
        #[serde(default)]
        runtime_state: TriggerState,
    },
    /// Trading action executed whenever an upstream trigger fires.
    Action {
        /// Unique identifier for this node.
        id: NodeId,
        /// Catalog entry this action was created from.
        kind: ActionKind,
        /// Display name.
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        config: ActionConfig,
        #[serde(default)]
        runtime_state: ActionState,
    },
}

impl Node {
    /// Build a fresh trigger node with idle runtime state.
    pub fn trigger(id: impl Into<NodeId>, kind: TriggerKind, config: TriggerConfig) -> Self {
        Node::Trigger {
            id: id.into(),
            kind,
            label: kind.title().to_string(),
            description: Some(kind.description().to_string()),
            position: None,
            config,
            runtime_state: TriggerState::default(),
        }
    }

    /// Build a fresh action node that has never executed.
    pub fn action(id: impl Into<NodeId>, kind: ActionKind, config: ActionConfig) -> Self {
        Node::Action {
            id: id.into(),
            kind,
            label: kind.title().to_string(),
            description: Some(kind.description().to_string()),
            position: None,
            config,
            runtime_state: ActionState::default(),
        }
    }

    /// Id scheme used by the editor: `<kind>-<unix millis>`.
    pub fn generate_id(kind_slug: &str, now: DateTime<Utc>) -> NodeId {
        format!("{kind_slug}-{}", now.timestamp_millis())
    }

    pub fn with_label(mut self, new_label: impl Into<String>) -> Self {
        match &mut self {
            Node::Trigger { label, .. } | Node::Action { label, .. } => *label = new_label.into(),
        }
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        match &mut self {
            Node::Trigger { position, .. } | Node::Action { position, .. } => {
                *position = Some(Position { x, y })
            }
        }
        self
    }

    /// Extract the node ID regardless of variant.
    pub fn id(&self) -> &str {
        match self {
            Node::Trigger { id, .. } | Node::Action { id, .. } => id,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Node::Trigger { .. } => Category::Trigger,
            Node::Action { .. } => Category::Action,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Trigger { label, .. } | Node::Action { label, .. } => label,
        }
    }

    /// Short summary for display (category + key config).
    pub fn summary(&self) -> String {
        match self {
            Node::Trigger { config, .. } => format!(
                "trigger({} {} {})",
                config.asset, config.condition, config.threshold
            ),
            Node::Action { config, .. } => format!(
                "action({:?} {:?} {} ${} {}x)",
                config.exchange, config.position, config.pair, config.amount_usd, config.leverage
            ),
        }
    }

    /// Validate the variant-specific configuration.
    pub fn check_config(&self) -> Result<(), ConfigError> {
        match self {
            Node::Trigger { config, .. } => config.check(),
            Node::Action { config, .. } => config.check(),
        }
    }

    /// Copy of this node carrying `state`. Action nodes are returned unchanged.
    pub fn with_trigger_state(&self, state: TriggerState) -> Node {
        let mut next = self.clone();
        if let Node::Trigger { runtime_state, .. } = &mut next {
            *runtime_state = state;
        }
        next
    }

    /// Copy of this node carrying `state`. Trigger nodes are returned unchanged.
    pub fn with_action_state(&self, state: ActionState) -> Node {
        let mut next = self.clone();
        if let Node::Action { runtime_state, .. } = &mut next {
            *runtime_state = state;
        }
        next
    }
}
