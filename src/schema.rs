use schemars::schema_for;

use crate::model::Graph;

/// Generate and print the JSON Schema for the graph snapshot.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(Graph);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
