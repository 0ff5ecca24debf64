//! Configuration management for CareChain

use serde::Deserialize;
use std::fs;

use crate::digest::{strategy_from_name, DIGEST_HEX_LEN};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mining: MiningConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MiningConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default = "default_max_nonce_iterations")]
    pub max_nonce_iterations: u64,
    /// Digest strategy name: "sha256" (default) or "rolling" for chains
    /// written by the original client.
    #[serde(default = "default_digest")]
    pub digest: String,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            max_nonce_iterations: default_max_nonce_iterations(),
            digest: default_digest(),
        }
    }
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Provide sane defaults when config.toml is absent
        Config {
            database: DatabaseConfig::default(),
            mining: MiningConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.database.path.is_empty() {
        return Err("database.path must be set in config.toml".into());
    }

    if config.mining.difficulty as usize > DIGEST_HEX_LEN {
        return Err("mining.difficulty cannot exceed the digest length".into());
    }

    if config.mining.max_nonce_iterations == 0 {
        return Err("mining.max_nonce_iterations must be greater than zero".into());
    }

    if strategy_from_name(&config.mining.digest).is_none() {
        return Err(format!("unknown digest strategy '{}'", config.mining.digest).into());
    }

    Ok(config)
}

fn default_db_path() -> String {
    "carechain.db".to_string()
}

fn default_difficulty() -> u32 {
    2
}

fn default_max_nonce_iterations() -> u64 {
    10_000_000
}

fn default_digest() -> String {
    "sha256".to_string()
}
