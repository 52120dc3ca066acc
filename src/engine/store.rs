use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{ConfigError, Edge, Graph, GraphStats, Node, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Duplicate node ID `{node_id}`")]
    DuplicateNodeId { node_id: String },

    #[error("Node ID `{node_id}` was used by a deleted node and cannot be reused")]
    RetiredNodeId { node_id: String },

    #[error("Unknown node `{node_id}`")]
    UnknownNode { node_id: String },

    #[error("Node `{node_id}` has an invalid config: {source}")]
    InvalidConfig {
        node_id: String,
        #[source]
        source: ConfigError,
    },
}

/// Id-keyed node arena plus the edge list.
///
/// Nodes are never mutated in place: [`GraphStore::update`] swaps in a new
/// node produced from the old one. Ids of removed nodes are retired for the
/// lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    retired: HashSet<NodeId>,
}

impl GraphStore {
    /// Build a store from a snapshot. Node order is preserved.
    pub fn from_graph(graph: Graph) -> Result<Self, StoreError> {
        let mut store = GraphStore {
            edges: graph.edges,
            ..Default::default()
        };
        for node in graph.nodes {
            store.push(node)?;
        }
        Ok(store)
    }

    /// Export the current nodes (with runtime state) and edges.
    pub fn snapshot(&self) -> Graph {
        Graph::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `id`, in snapshot order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::count(&self.nodes, self.edges.len())
    }

    /// Add a node. Rejects invalid configs, live duplicates and retired ids.
    pub fn insert_node(&mut self, node: Node) -> Result<(), StoreError> {
        node.check_config()
            .map_err(|source| StoreError::InvalidConfig {
                node_id: node.id().to_string(),
                source,
            })?;
        if self.retired.contains(node.id()) {
            return Err(StoreError::RetiredNodeId {
                node_id: node.id().to_string(),
            });
        }
        self.push(node)
    }

    /// Remove a node and every edge touching it. Its id is retired.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let pos = self.index.remove(id)?;
        let node = self.nodes.remove(pos);
        self.edges.retain(|e| e.source != id && e.target != id);
        self.retired.insert(node.id().to_string());
        self.reindex();
        Some(node)
    }

    /// Wire `source` to `target`. Both endpoints must exist.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), StoreError> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(StoreError::UnknownNode {
                    node_id: id.to_string(),
                });
            }
        }
        self.edges.push(Edge::new(source, target));
        Ok(())
    }

    /// Remove every edge from `source` to `target`. Returns whether any existed.
    pub fn disconnect(&mut self, source: &str, target: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| !(e.source == source && e.target == target));
        self.edges.len() != before
    }

    /// Canvas clear: drop everything, retiring every id.
    pub fn clear(&mut self) {
        self.retired.extend(self.index.drain().map(|(id, _)| id));
        self.nodes.clear();
        self.edges.clear();
    }

    /// Replace node `id` with `f(old)`. Returns false if the id is unknown.
    ///
    /// The replacement must keep the same id.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&Node) -> Node) -> bool {
        let Some(&pos) = self.index.get(id) else {
            return false;
        };
        let next = f(&self.nodes[pos]);
        debug_assert_eq!(next.id(), id, "update must not change a node's id");
        self.nodes[pos] = next;
        true
    }

    fn push(&mut self, node: Node) -> Result<(), StoreError> {
        if self.index.contains_key(node.id()) {
            return Err(StoreError::DuplicateNodeId {
                node_id: node.id().to_string(),
            });
        }
        self.index.insert(node.id().to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id().to_string(), i))
            .collect();
    }
}
