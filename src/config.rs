use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SextantConfig {
    pub node: NodeConfig,
    /// Network name -> JSON-RPC endpoint.
    #[serde(default = "default_networks")]
    pub networks: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeConfig {
    pub accounts_dir: String,
    pub network: String,
    pub sync_interval_secs: u64,
    pub confirmation_depth: u64,
    pub log_level: String,
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

fn default_history_file() -> String {
    ".sextant_history".to_string()
}

fn default_networks() -> HashMap<String, String> {
    let mut networks = HashMap::new();
    networks.insert("testnet".to_string(), "http://127.0.0.1:9000".to_string());
    networks
}

impl Default for SextantConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                accounts_dir: "./accounts".to_string(),
                network: "testnet".to_string(),
                sync_interval_secs: 30,
                confirmation_depth: 6,
                log_level: "info".to_string(),
                history_file: ".sextant_history".to_string(),
            },
            networks: default_networks(),
        }
    }
}

impl SextantConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => {
                        tracing::info!("Config loaded from {}", path);
                        c
                    }
                    Err(e) => {
                        eprintln!("Error parsing config: {}. Using Defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading config: {}. Using Defaults.", e);
                    Self::default()
                }
            }
        } else {
            eprintln!("Config file not found at '{}'. Creating default.", path);
            let config = Self::default();
            if let Ok(s) = toml::to_string_pretty(&config) {
                let _ = std::fs::write(path, s);
            }
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SextantConfig::default();
        assert_eq!(config.node.network, "testnet");
        assert!(config.networks.contains_key("testnet"));
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = SextantConfig::default();
        let s = toml::to_string_pretty(&config).unwrap();
        let parsed: SextantConfig = toml::from_str(&s).unwrap();
        assert_eq!(parsed.node.sync_interval_secs, config.node.sync_interval_secs);
        assert_eq!(parsed.node.accounts_dir, config.node.accounts_dir);
    }
}
