mod config;
mod graph;
mod references;

use std::path::Path;

use thiserror::Error;

use crate::engine::store::StoreError;
use crate::model::{ConfigError, Graph, SnapshotError};

pub use graph::{IntegrityWarning, check_integrity};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Cannot read snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Duplicate node ID `{node_id}`")]
    DuplicateNodeId { node_id: String },

    #[error("Node `{node_id}` has an invalid config: {source}")]
    InvalidConfig {
        node_id: String,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Load and fully validate a graph from a JSON snapshot file.
pub fn load_and_validate(path: &Path) -> Result<Graph, Vec<ValidationError>> {
    let graph = Graph::load(path).map_err(|e| vec![ValidationError::Snapshot(e)])?;
    validate(&graph)?;
    Ok(graph)
}

/// Validate a graph, collecting all errors.
///
/// Integrity problems (dangling or miswired edges) are not errors; see
/// [`check_integrity`].
pub fn validate(graph: &Graph) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    errors.extend(references::check_duplicate_ids(graph));
    errors.extend(config::check_node_configs(graph));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Fold a list of validation errors into one `anyhow` error.
pub fn into_anyhow(context: &str, errors: Vec<ValidationError>) -> anyhow::Error {
    let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow::anyhow!("{context}:\n  {}", msgs.join("\n  "))
}

/// CLI entry point for the `validate` subcommand.
pub fn run(path: &Path) -> anyhow::Result<()> {
    match load_and_validate(path) {
        Ok(graph) => {
            println!("Graph is valid. {}.", graph.stats());
            let warnings = check_integrity(&graph);
            if !warnings.is_empty() {
                println!("{} warning(s):", warnings.len());
                for (i, w) in warnings.iter().enumerate() {
                    println!("  {}. {}", i + 1, w);
                }
            }
            Ok(())
        }
        Err(errors) => {
            eprintln!("Validation failed with {} error(s):", errors.len());
            for (i, e) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, e);
            }
            std::process::exit(1);
        }
    }
}
