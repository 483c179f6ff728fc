//! Event-loop-owned node state.

use crate::error::NodeError;
use stele_core::{Block, NodeConfig};
use stele_ledger::{AuthorityRegistry, LedgerState, TxPool};
use tracing::info;

/// Everything one node owns: chain state, rotation cursor, pending pool,
/// and its configuration.
///
/// Exactly one event-loop task holds a `NodeContext`; there are no
/// globals and no shared references. All mutation flows through the
/// producer/validator paths, which in turn funnel into
/// [`LedgerState::apply_block`].
#[derive(Debug)]
pub struct NodeContext {
    /// Chain, account, and contract state
    pub ledger: LedgerState,
    /// Round-robin production rotation
    pub registry: AuthorityRegistry,
    /// Pending transactions
    pub pool: TxPool,
    /// Static node configuration
    pub config: NodeConfig,
}

impl NodeContext {
    /// Build a node's state from configuration and apply genesis.
    ///
    /// Genesis derives only from configured values, so every identically
    /// configured node starts from the same block zero without any
    /// network round.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let registry = AuthorityRegistry::new(config.authorities.clone())?;
        let mut ledger = LedgerState::new();
        let genesis = Block::genesis(config.authorities[0], config.genesis_timestamp);
        let genesis_hash = genesis.hash;
        ledger.apply_block(genesis)?;
        info!(
            chain_id = config.chain_id,
            authorities = registry.len(),
            genesis = %genesis_hash.short(),
            "ledger initialized at genesis"
        );
        Ok(Self {
            ledger,
            registry,
            pool: TxPool::new(),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stele_core::Address;

    #[test]
    fn identical_configs_share_genesis() {
        let config = NodeConfig {
            authorities: vec![Address::derive(b"authority-0")],
            ..NodeConfig::default()
        };
        let a = NodeContext::new(config.clone()).unwrap();
        let b = NodeContext::new(config).unwrap();
        assert_eq!(
            a.ledger.head().unwrap().hash,
            b.ledger.head().unwrap().hash
        );
        assert_eq!(a.ledger.head().unwrap().number, 0);
    }

    #[test]
    fn empty_authority_config_is_refused() {
        assert!(NodeContext::new(NodeConfig::default()).is_err());
    }
}
