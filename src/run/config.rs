use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::feed::DEFAULT_ASSETS;

/// Runtime configuration for the `run` command, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub interval: Duration,
    pub seed: u64,
    /// Stop after this many ticks (`Some(1)` for `--once`).
    pub max_ticks: Option<u64>,
    pub state_file: Option<PathBuf>,
    /// Symbols the simulated feed quotes.
    pub symbols: Vec<String>,
}

impl RuntimeConfig {
    pub fn from_cli(cli: &crate::run::RunConfig) -> Result<Self> {
        if cli.interval_ms == 0 {
            bail!("--interval-ms must be greater than 0");
        }

        let max_ticks = match (cli.once, cli.ticks) {
            (true, Some(_)) => bail!("--once and --ticks cannot be combined"),
            (true, None) => Some(1),
            (false, Some(0)) => bail!("--ticks must be greater than 0"),
            (false, ticks) => ticks,
        };

        let symbols = match cli.symbols.as_deref() {
            Some(list) => parse_symbols(list),
            None => DEFAULT_ASSETS.iter().map(|(s, _)| s.to_string()).collect(),
        };
        if symbols.is_empty() {
            bail!("--symbols must name at least one asset");
        }

        Ok(RuntimeConfig {
            interval: Duration::from_millis(cli.interval_ms),
            seed: cli.seed.unwrap_or_else(rand::random),
            max_ticks,
            state_file: cli.state_file.clone(),
            symbols,
        })
    }
}

/// Split a comma-separated symbol list, upper-casing and dropping blanks/duplicates.
fn parse_symbols(list: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for s in list.split(',').map(|s| s.trim().to_uppercase()) {
        if !s.is_empty() && !symbols.contains(&s) {
            symbols.push(s);
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::RunConfig;

    fn cli() -> RunConfig {
        RunConfig {
            interval_ms: 3000,
            seed: Some(7),
            ticks: None,
            once: false,
            state_file: None,
            symbols: None,
        }
    }

    #[test]
    fn defaults_to_editor_assets() {
        let config = RuntimeConfig::from_cli(&cli()).unwrap();
        assert_eq!(config.symbols.len(), DEFAULT_ASSETS.len());
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(config.max_ticks, None);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn once_means_one_tick() {
        let config = RuntimeConfig::from_cli(&RunConfig { once: true, ..cli() }).unwrap();
        assert_eq!(config.max_ticks, Some(1));
    }

    #[test]
    fn rejects_bad_combinations() {
        assert!(RuntimeConfig::from_cli(&RunConfig { interval_ms: 0, ..cli() }).is_err());
        assert!(RuntimeConfig::from_cli(&RunConfig { ticks: Some(0), ..cli() }).is_err());
        assert!(
            RuntimeConfig::from_cli(&RunConfig {
                once: true,
                ticks: Some(3),
                ..cli()
            })
            .is_err()
        );
        assert!(
            RuntimeConfig::from_cli(&RunConfig {
                symbols: Some(" , ".into()),
                ..cli()
            })
            .is_err()
        );
    }

    #[test]
    fn symbols_are_normalized() {
        assert_eq!(parse_symbols("sol, btc,SOL,,eth"), vec!["SOL", "BTC", "ETH"]);
    }
}
