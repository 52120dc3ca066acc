use clap::Parser;
use tracing_subscriber::EnvFilter;

use trigger_flow::{example, list_nodes, run, schema, validate, visualize};

mod cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Schema => schema::run(),
        cli::Command::Validate { file } => validate::run(&file),
        cli::Command::Visualize {
            file,
            format,
            output,
        } => visualize::run(&file, &format, output.as_deref()),
        cli::Command::ListNodes => list_nodes::run(),
        cli::Command::Example => example::run(),
        cli::Command::Run {
            file,
            interval_ms,
            seed,
            ticks,
            once,
            state_file,
            symbols,
        } => run::run(
            &file,
            &run::RunConfig {
                interval_ms,
                seed,
                ticks,
                once,
                state_file,
                symbols,
            },
        ),
    }
}
