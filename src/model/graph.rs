use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::edge::Edge;
use super::node::{Category, Node};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted snapshot: every node (with its runtime state) and every wire.
///
/// This is the document the editor saves as `trading-workflow.json`.
/// Missing `nodes`/`edges` load as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Graph {
    /// Trigger and action nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Trigger -> action wires.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Graph { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a snapshot file without validating it.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write a snapshot file, replacing any previous one.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::count(&self.nodes, self.edges.len())
    }
}

/// Counters shown in the editor's stats panel and footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub triggers: usize,
    pub actions: usize,
    pub nodes: usize,
    pub connections: usize,
}

impl GraphStats {
    pub fn count<'a>(nodes: impl IntoIterator<Item = &'a Node>, connections: usize) -> Self {
        let mut stats = GraphStats {
            connections,
            ..Default::default()
        };
        for node in nodes {
            stats.nodes += 1;
            match node.category() {
                Category::Trigger => stats.triggers += 1,
                Category::Action => stats.actions += 1,
            }
        }
        stats
    }
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} triggers, {} actions ({} nodes, {} connections)",
            self.triggers, self.actions, self.nodes, self.connections
        )
    }
}
