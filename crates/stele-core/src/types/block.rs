//! Blocks.

use crate::hash::Hasher;
use crate::types::ids::{Address, BlockHash};
use crate::types::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Gas ceiling stamped on every sealed block. Informational: nothing is
/// metered, the field exists for Ethereum tooling compatibility.
pub const BLOCK_GAS_LIMIT: u64 = 8_000_000;

/// One sealed block.
///
/// Immutable once accepted. `number` is the position in the chain,
/// `parent_hash` links to the previous block (all-zero for genesis), and
/// `hash` is derived from the header fields plus the ordered transaction
/// hashes. The difficulty/gas/size fields carry no consensus weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 0
    pub number: u64,
    /// Content-derived identity
    pub hash: BlockHash,
    /// Hash of block `number - 1`; all-zero for genesis
    #[serde(rename = "parentHash")]
    pub parent_hash: BlockHash,
    /// Seal time, unix seconds
    pub timestamp: u64,
    /// Authority this block is attributed to
    pub miner: Address,
    /// Included transactions in application order
    pub transactions: Vec<Transaction>,
    /// Informational; constant under proof-of-authority
    pub difficulty: u64,
    /// Sum of included gas allowances (informational)
    #[serde(rename = "gasUsed")]
    pub gas_used: u64,
    /// Gas ceiling (informational)
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
    /// Serialized size in bytes (informational)
    pub size: u64,
}

impl Block {
    /// Build the genesis block for a chain.
    ///
    /// Deterministic given miner and timestamp, so every node configured
    /// identically starts from the same block zero.
    pub fn genesis(miner: Address, timestamp: u64) -> Self {
        Self::seal(0, BlockHash::ZERO, timestamp, miner, Vec::new())
    }

    /// Seal a block: derive its hash and informational fields.
    pub fn seal(
        number: u64,
        parent_hash: BlockHash,
        timestamp: u64,
        miner: Address,
        transactions: Vec<Transaction>,
    ) -> Self {
        let gas_used = transactions.iter().map(|tx| tx.gas).sum();
        let hash = Self::derive_hash(number, &parent_hash, timestamp, &miner, &transactions);
        let mut block = Self {
            number,
            hash,
            parent_hash,
            timestamp,
            miner,
            transactions,
            difficulty: 1,
            gas_used,
            gas_limit: BLOCK_GAS_LIMIT,
            size: 0,
        };
        block.size = serde_json::to_vec(&block).map(|raw| raw.len() as u64).unwrap_or(0);
        block
    }

    /// Whether this is the chain's first block.
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }

    fn derive_hash(
        number: u64,
        parent_hash: &BlockHash,
        timestamp: u64,
        miner: &Address,
        transactions: &[Transaction],
    ) -> BlockHash {
        let mut hasher = Hasher::new();
        hasher.update(b"STELE_BLOCK");
        hasher.update(&number.to_le_bytes());
        hasher.update(&parent_hash.0);
        hasher.update(&timestamp.to_le_bytes());
        hasher.update(miner.as_bytes());
        hasher.update(&(transactions.len() as u64).to_le_bytes());
        for tx in transactions {
            hasher.update(&tx.hash.0);
        }
        BlockHash::new(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_deterministic() {
        let miner = Address::derive(b"authority-0");
        assert_eq!(Block::genesis(miner, 1700000000), Block::genesis(miner, 1700000000));
        assert_ne!(
            Block::genesis(miner, 1700000000).hash,
            Block::genesis(miner, 1700000001).hash
        );
    }

    #[test]
    fn hash_covers_transaction_order() {
        let miner = Address::derive(b"authority-0");
        let t1 = Transaction::new(Address::derive(b"a"), None, 0, 0, 0, vec![1], 0);
        let t2 = Transaction::new(Address::derive(b"b"), None, 0, 0, 0, vec![2], 0);
        let forward = Block::seal(1, BlockHash::ZERO, 5, miner, vec![t1.clone(), t2.clone()]);
        let reverse = Block::seal(1, BlockHash::ZERO, 5, miner, vec![t2, t1]);
        assert_ne!(forward.hash, reverse.hash);
    }

    #[test]
    fn sealed_fields_are_populated() {
        let miner = Address::derive(b"authority-0");
        let tx = Transaction::new(Address::derive(b"a"), None, 0, 21_000, 0, vec![], 0);
        let block = Block::seal(3, BlockHash::new([9; 32]), 7, miner, vec![tx]);
        assert_eq!(block.gas_used, 21_000);
        assert_eq!(block.gas_limit, BLOCK_GAS_LIMIT);
        assert!(block.size > 0);
        assert_ne!(block.hash, BlockHash::ZERO);
    }
}
