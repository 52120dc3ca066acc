use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A directed wire from a trigger to an action.
///
/// Endpoint categories are not enforced here; malformed edges are reported
/// by the integrity check and skipped at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Edge {
    /// Source node ID (a trigger).
    pub source: NodeId,
    /// Destination node ID (an action).
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }
}
