use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Identifiers stamped onto every generated ticket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    pub client_id: u64,
    pub tenant_id: String,
    pub soc_id: String,
}

#[derive(Debug, Deserialize)]
struct Config {
    routing: RoutingConfig,
}

impl RoutingConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config.routing)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            client_id: 43194,
            tenant_id: "1".to_string(),
            soc_id: "1".to_string(),
        }
    }
}
