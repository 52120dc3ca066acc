use std::path::Path;

use crate::model::{Category, Graph, Node};
use crate::validate;

/// Entry point for the `visualize` command.
pub fn run(path: &Path, format: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let graph = validate::load_and_validate(path)
        .map_err(|errs| validate::into_anyhow("Cannot visualize invalid graph", errs))?;

    match format {
        "ascii" => write_output(&render_ascii(&graph), output),
        "dot" => write_output(&render_dot(&graph), output),
        other => anyhow::bail!("Unknown format '{other}'. Use: ascii, dot"),
    }
}

// ── DOT Rendering ────────────────────────────────────────────────────

/// Render the graph as a DOT language string, left to right.
pub fn render_dot(graph: &Graph) -> String {
    let mut dot = String::new();
    dot.push_str("digraph triggers {\n");
    dot.push_str("    rankdir=LR;\n");
    dot.push_str("    node [fontname=\"Helvetica\", fontsize=10, shape=box, style=\"rounded,filled\"];\n");
    dot.push_str("    edge [color=\"#3b82f6\", penwidth=2];\n\n");

    for node in &graph.nodes {
        let (border, fill) = match node.category() {
            Category::Trigger => ("#10b981", "#f0fdf4"),
            Category::Action => ("#3b82f6", "#f0f9ff"),
        };
        let fired = matches!(
            node,
            Node::Trigger { runtime_state, .. } if runtime_state.fired
        );
        dot.push_str(&format!(
            "    \"{}\" [label=\"{}\\n{}\", color=\"{border}\", fillcolor=\"{fill}\"{}];\n",
            escape_dot(node.id()),
            escape_dot(node.label()),
            escape_dot(&node_detail(node)),
            if fired { ", penwidth=3" } else { "" }
        ));
    }

    dot.push('\n');

    for edge in &graph.edges {
        dot.push_str(&format!(
            "    \"{}\" -> \"{}\";\n",
            escape_dot(&edge.source),
            escape_dot(&edge.target)
        ));
    }

    dot.push_str("}\n");
    dot
}

/// Short configuration summary for a node.
fn node_detail(node: &Node) -> String {
    match node {
        Node::Trigger { config, .. } => {
            format!("{} {} ${}", config.asset, config.condition, config.threshold)
        }
        Node::Action { config, .. } => format!(
            "{} {:?} {} ${} {}x",
            config.exchange.name(),
            config.position,
            config.pair,
            config.amount_usd,
            config.leverage
        ),
    }
}

/// Escape special characters for DOT format.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

// ── ASCII Rendering ──────────────────────────────────────────────────

/// One block per trigger listing the actions it dispatches to, then any
/// action no trigger reaches.
pub fn render_ascii(graph: &Graph) -> String {
    let mut out = String::new();
    let rule = "\u{2500}".repeat(60);

    out.push_str(&format!("\n  {rule}\n\n"));

    for node in graph.nodes.iter().filter(|n| n.category() == Category::Trigger) {
        out.push_str(&format!(
            "  [{}: {}] {}\n",
            node.id(),
            node.label(),
            node_detail(node)
        ));
        let mut wired = false;
        for edge in graph.edges.iter().filter(|e| e.source == node.id()) {
            wired = true;
            let target = match graph.node(&edge.target) {
                Some(t) => format!("[{}: {}] {}", t.id(), t.label(), node_detail(t)),
                None => format!("[{}: missing]", edge.target),
            };
            out.push_str(&format!("      \u{2500}\u{2500}\u{25b6} {target}\n"));
        }
        if !wired {
            out.push_str("      (no actions)\n");
        }
        out.push('\n');
    }

    let orphans: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| n.category() == Category::Action)
        .filter(|n| !graph.edges.iter().any(|e| e.target == n.id()))
        .collect();
    if !orphans.is_empty() {
        out.push_str("  Unwired actions:\n");
        for node in orphans {
            out.push_str(&format!(
                "    [{}: {}] {}\n",
                node.id(),
                node.label(),
                node_detail(node)
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("  {rule}\n  {}\n\n", graph.stats()));
    out
}

// ── Output ───────────────────────────────────────────────────────────

/// Write text output to file or stdout.
fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!("Written to {}", path.display());
    } else {
        print!("{content}");
    }
    Ok(())
}
