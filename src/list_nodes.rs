use crate::feed::DEFAULT_ASSETS;
use crate::model::{ActionKind, Condition, Exchange, TriggerKind};

/// Print a human-readable listing of all node kinds and their parameters.
pub fn run() -> anyhow::Result<()> {
    println!("Trigger Nodes (category: \"trigger\")");
    println!("===================================");
    for kind in TriggerKind::ALL {
        println!("  {:<16} {}", kind.slug(), kind.description());
    }
    println!();
    println!("  Parameters (config):");
    println!(
        "    - asset:     String     ({})",
        DEFAULT_ASSETS
            .iter()
            .map(|(s, _)| *s)
            .collect::<Vec<_>>()
            .join(" | ")
    );
    println!(
        "    - condition: Condition  ({})",
        Condition::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    println!("    - threshold: f64        (USD price level, > 0)");
    println!();
    println!("  above / below fire on every tick the level holds.");
    println!("  crosses_above / crosses_below fire only on the tick the price crosses.");
    println!();

    println!("Action Nodes (category: \"action\")");
    println!("=================================");
    for kind in ActionKind::ALL {
        println!("  {:<16} {}", kind.slug(), kind.description());
    }
    println!();
    println!("  Parameters (config):");
    println!(
        "    - exchange:   Exchange      ({})",
        Exchange::ALL
            .iter()
            .map(|e| e.name().to_lowercase())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    println!("    - pair:       String        (e.g. \"SOLUSDT\")");
    println!("    - position:   PositionSide  (long | short)");
    println!("    - amount_usd: f64           (> 0)");
    println!("    - leverage:   u32           (1..=125)");
    println!();

    println!("Edges");
    println!("=====");
    println!("  {{\"source\": <trigger id>, \"target\": <action id>}}");
    Ok(())
}
