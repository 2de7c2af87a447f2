use anyhow::Result;
use log::{info, warn};
use std::fs;

use m365_preprocess::{CustomFields, Mapper, RoutingConfig, SecurityAlert, TicketAction};

const CONFIG_PATH: &str = "config.toml";
const INPUT_PATH: &str = "data/M365_alert.json";
const OUTPUT_PATH: &str = "output_m365.json";

fn main() -> Result<()> {
    env_logger::init();

    info!("🚀 Starting M365 alert preprocessing...");

    let routing = RoutingConfig::from_file(CONFIG_PATH).unwrap_or_else(|e| {
        warn!("Failed to load {}: {}. Using default routing identifiers.", CONFIG_PATH, e);
        RoutingConfig::default()
    });

    let contents = fs::read_to_string(INPUT_PATH)
        .map_err(|e| anyhow::anyhow!("Failed to read alert file '{}': {}", INPUT_PATH, e))?;
    let raw: serde_json::Value = serde_json::from_str(&contents)?;

    let alert = SecurityAlert::from_graph_alert(&routing, &Mapper::new(&raw))?;
    if alert.is_critical() {
        warn!("⚠️  {} severity alert {}: {}", alert.severity, alert.alert_id, alert.name);
    }
    info!("Normalized alert {} with {} events", alert.alert_id, alert.events.len());

    let action = TicketAction::create(alert.clone());
    let fields = CustomFields::new(&routing, action, alert);

    println!("{}", serde_json::to_string_pretty(&fields)?);

    fs::write(OUTPUT_PATH, serde_json::to_string(&fields)?)
        .map_err(|e| anyhow::anyhow!("Failed to write output file '{}': {}", OUTPUT_PATH, e))?;

    info!("✅ Wrote ticket custom fields to {}", OUTPUT_PATH);

    Ok(())
}
