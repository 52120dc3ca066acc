use crate::model::Graph;

use super::ValidationError;

/// Check every node's configuration (thresholds, amounts, leverage, symbols).
pub fn check_node_configs(graph: &Graph) -> Vec<ValidationError> {
    graph
        .nodes
        .iter()
        .filter_map(|node| {
            node.check_config()
                .err()
                .map(|source| ValidationError::InvalidConfig {
                    node_id: node.id().to_string(),
                    source,
                })
        })
        .collect()
}
