//! Keeper configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for Solana cluster
    pub rpc_url: String,

    /// gvtoken program ID
    pub token_program: Pubkey,

    /// Keeper wallet keypair path
    pub keypair_path: String,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Maximum finalizations submitted per poll tick
    pub max_finalizations_per_batch: usize,

    /// Clock-skew margin: only finalize requests that matured at least
    /// this many seconds ago
    pub maturity_margin_secs: u32,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("KEEPER_CONFIG")
            .unwrap_or_else(|_| "keeper-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_devnet() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            token_program: Pubkey::from_str("GvBtvoNLZs5LcUybpVEUUN7BNboTQRRsw5ZUXQkoAGRf")
                .unwrap(),
            keypair_path: "~/.config/solana/id.json".to_string(),
            poll_interval_secs: 30,
            max_finalizations_per_batch: 8,
            maturity_margin_secs: 0,
        }
    }
}
