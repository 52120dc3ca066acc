pub mod edge;
pub mod graph;
pub mod node;
pub mod state;

pub use edge::Edge;
pub use graph::{Graph, GraphStats, SnapshotError};
pub use node::{
    ActionConfig, ActionKind, Category, Condition, ConfigError, Exchange, Node, NodeId,
    Position, PositionSide, TriggerConfig, TriggerKind,
};
pub use state::{ActionState, TriggerState};
