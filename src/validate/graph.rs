use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;

use crate::model::{Category, Graph};

/// A recoverable wiring problem. The engine skips the affected edge at
/// dispatch time; nothing here prevents a graph from running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityWarning {
    #[error("Edge {from_node} -> {to_node} references unknown node `{missing}`")]
    DanglingEdge {
        from_node: String,
        to_node: String,
        missing: String,
    },

    #[error("Edge {from_node} -> {to_node} connects {from_category} -> {to_category} (expected trigger -> action)")]
    Miswired {
        from_node: String,
        to_node: String,
        from_category: Category,
        to_category: Category,
    },

    #[error("Trigger `{node_id}` is not wired to any action")]
    UnwiredTrigger { node_id: String },

    #[error("Action `{node_id}` is not reachable from any trigger")]
    UnreachableAction { node_id: String },
}

/// Build a petgraph DiGraph of the well-formed trigger -> action wiring and
/// report every edge or node that would be skipped or never used.
pub fn check_integrity(graph: &Graph) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let mut wiring = DiGraph::<Category, ()>::new();
    let mut index_map: HashMap<&str, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        index_map
            .entry(node.id())
            .or_insert_with(|| wiring.add_node(node.category()));
    }

    for edge in &graph.edges {
        let (from_idx, to_idx) = match (
            index_map.get(edge.source.as_str()),
            index_map.get(edge.target.as_str()),
        ) {
            (Some(&from), Some(&to)) => (from, to),
            (from, _) => {
                let missing = if from.is_none() {
                    &edge.source
                } else {
                    &edge.target
                };
                warnings.push(IntegrityWarning::DanglingEdge {
                    from_node: edge.source.clone(),
                    to_node: edge.target.clone(),
                    missing: missing.clone(),
                });
                continue;
            }
        };

        let (from_category, to_category) = (wiring[from_idx], wiring[to_idx]);
        if from_category != Category::Trigger || to_category != Category::Action {
            warnings.push(IntegrityWarning::Miswired {
                from_node: edge.source.clone(),
                to_node: edge.target.clone(),
                from_category,
                to_category,
            });
            continue;
        }

        wiring.add_edge(from_idx, to_idx, ());
    }

    for node in &graph.nodes {
        let idx = index_map[node.id()];
        match node.category() {
            Category::Trigger => {
                if wiring.neighbors_directed(idx, Direction::Outgoing).next().is_none() {
                    warnings.push(IntegrityWarning::UnwiredTrigger {
                        node_id: node.id().to_string(),
                    });
                }
            }
            Category::Action => {
                if wiring.neighbors_directed(idx, Direction::Incoming).next().is_none() {
                    warnings.push(IntegrityWarning::UnreachableAction {
                        node_id: node.id().to_string(),
                    });
                }
            }
        }
    }

    warnings
}
