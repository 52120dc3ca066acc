pub mod config;
pub mod driver;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::engine::Engine;
use crate::engine::clock::SystemClock;
use crate::engine::events::LogSink;
use crate::feed::RandomWalkFeed;
use crate::model::{Graph, Node};
use crate::validate;

use config::RuntimeConfig;
use driver::Driver;
pub use driver::{RunSummary, StopHandle, StopReason};

/// CLI-facing config struct (before validation).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub interval_ms: u64,
    pub seed: Option<u64>,
    pub ticks: Option<u64>,
    pub once: bool,
    pub state_file: Option<PathBuf>,
    pub symbols: Option<String>,
}

/// Entry point for the `run` command.
pub fn run(graph_path: &Path, cli_config: &RunConfig) -> Result<()> {
    let config = RuntimeConfig::from_cli(cli_config)?;
    let graph = load_graph(graph_path, config.state_file.as_deref())?;

    for warning in validate::check_integrity(&graph) {
        warn!("{warning}");
    }

    let symbols = feed_symbols(&config.symbols, &graph);

    println!("=== trigger-flow run ===");
    println!("Graph:    {} ({})", graph_path.display(), graph.stats());
    println!("Interval: {:?}", config.interval);
    println!("Symbols:  {}", symbols.join(", "));
    println!("Seed:     {}", config.seed);
    match config.max_ticks {
        Some(n) => println!("Ticks:    {n}"),
        None => println!("Ticks:    until Ctrl-C"),
    }
    if let Some(path) = &config.state_file {
        println!("Snapshot: {}", path.display());
    }
    println!();

    let engine = Engine::new(graph)
        .map_err(|errors| validate::into_anyhow("Graph validation failed", errors))?;

    let feed = RandomWalkFeed::new(symbols, config.seed);
    let mut driver = Driver::new(engine, feed, SystemClock, LogSink, config.interval)
        .with_max_ticks(config.max_ticks)
        .with_state_file(config.state_file.clone());

    let stop = driver.stop_handle();
    ctrlc::set_handler(move || stop.stop()).context("installing Ctrl-C handler")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let summary = rt.block_on(driver.run())?;

    println!();
    println!(
        "Stopped ({:?}) after {} tick(s): {} trigger fire(s), {} action execution(s).",
        summary.stop_reason, summary.ticks, summary.triggers_fired, summary.actions_executed
    );
    Ok(())
}

/// Resume from the snapshot file when one exists, otherwise start from the graph file.
fn load_graph(graph_path: &Path, state_file: Option<&Path>) -> Result<Graph> {
    let source = match state_file {
        Some(state) if state.exists() => {
            info!("resuming from snapshot {}", state.display());
            state
        }
        _ => graph_path,
    };
    validate::load_and_validate(source).map_err(|errors| {
        validate::into_anyhow(&format!("Cannot load {}", source.display()), errors)
    })
}

/// The configured symbols plus any trigger asset they do not cover.
fn feed_symbols(configured: &[String], graph: &Graph) -> Vec<String> {
    let mut symbols = configured.to_vec();
    for node in &graph.nodes {
        if let Node::Trigger { config, .. } = node {
            if !symbols.contains(&config.asset) {
                symbols.push(config.asset.clone());
            }
        }
    }
    symbols
}
