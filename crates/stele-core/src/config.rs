//! Node configuration.
//!
//! Loaded from a toml file, every field individually defaulted so a
//! partial file (or none at all) still yields a runnable node. The
//! authority list must be identical on every node of a network: genesis
//! and the production rotation both derive from it.

use crate::error::{CoreError, Result};
use crate::types::ids::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_chain_id() -> u64 {
    7245
}

fn default_network_id() -> u64 {
    7245
}

fn default_client_version() -> String {
    format!("stele/v{}", env!("CARGO_PKG_VERSION"))
}

fn default_rpc_listen() -> String {
    "127.0.0.1:8545".to_string()
}

fn default_block_interval_secs() -> u64 {
    5
}

fn default_genesis_timestamp() -> u64 {
    1_700_000_000
}

/// Complete configuration of one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Chain identifier reported by `eth_chainId`
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Network identifier reported by `net_version`
    #[serde(default = "default_network_id")]
    pub network_id: u64,

    /// Client identifier reported by `web3_clientVersion`
    #[serde(default = "default_client_version")]
    pub client_version: String,

    /// Listen address for the JSON-RPC endpoint
    #[serde(default = "default_rpc_listen")]
    pub rpc_listen: String,

    /// Seconds between production attempts; 0 disables the timer, leaving
    /// production to submissions and `evm_mine`
    #[serde(default = "default_block_interval_secs")]
    pub block_interval_secs: u64,

    /// Ordered authority set, identical across the network
    #[serde(default)]
    pub authorities: Vec<Address>,

    /// Sender attributed to `eth_sendRawTransaction` payloads; defaults to
    /// the first authority
    #[serde(default)]
    pub default_sender: Option<Address>,

    /// Timestamp of the genesis block, fixed so all nodes agree on it
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            network_id: default_network_id(),
            client_version: default_client_version(),
            rpc_listen: default_rpc_listen(),
            block_interval_secs: default_block_interval_secs(),
            authorities: Vec::new(),
            default_sender: None,
            genesis_timestamp: default_genesis_timestamp(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from a toml file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| CoreError::config(format!("read {}: {err}", path.display())))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|err| CoreError::config(format!("parse {}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Single-authority local development preset.
    pub fn dev() -> Self {
        Self {
            authorities: vec![Address::derive(b"stele-dev-authority-0")],
            ..Self::default()
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.authorities.is_empty() {
            return Err(CoreError::config("authority set is empty"));
        }
        if let Some(sender) = self.default_sender {
            if !self.authorities.contains(&sender) {
                return Err(CoreError::config(format!(
                    "default sender {sender} is not an authority"
                )));
            }
        }
        Ok(())
    }

    /// The sender attributed to raw transaction payloads.
    pub fn raw_transaction_sender(&self) -> Address {
        self.default_sender
            .or_else(|| self.authorities.first().copied())
            .unwrap_or(Address::ZERO)
    }
}
