use std::collections::HashSet;

use crate::model::Graph;

use super::ValidationError;

/// Check that all node IDs are unique.
pub fn check_duplicate_ids(graph: &Graph) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for node in &graph.nodes {
        if !seen.insert(node.id()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id().to_string(),
            });
        }
    }

    errors
}
