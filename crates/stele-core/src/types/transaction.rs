//! Transactions, submission requests, and lookup views.

use crate::encoding;
use crate::hash::Hasher;
use crate::types::ids::{Address, BlockHash, TxHash};
use serde::{Deserialize, Serialize};

/// A ledger transaction.
///
/// Immutable once created; the hash is derived from every other field, so
/// identical content yields an identical identity. Inclusion metadata
/// (block number/hash, index) lives in the ledger's transaction index, not
/// here.
///
/// There is no signature: `from` is caller-asserted. This mirrors the
/// trust model of the network this node participates in, where all writers
/// are known authorities, and is a documented security gap for any other
/// deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Content-derived identity
    pub hash: TxHash,
    /// Asserted sender
    pub from: Address,
    /// Recipient; `None` signals contract creation
    pub to: Option<Address>,
    /// Transferred value
    #[serde(with = "encoding::hex_quantity")]
    pub value: u128,
    /// Gas allowance (informational, no execution happens)
    pub gas: u64,
    /// Gas price (informational)
    #[serde(rename = "gasPrice", with = "encoding::hex_quantity")]
    pub gas_price: u128,
    /// Opaque payload; bytecode when creating a contract
    #[serde(with = "encoding::hex_bytes")]
    pub input: Vec<u8>,
    /// Sender nonce at submission time
    pub nonce: u64,
}

impl Transaction {
    /// Build a transaction, deriving its hash from the remaining fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        from: Address,
        to: Option<Address>,
        value: u128,
        gas: u64,
        gas_price: u128,
        input: Vec<u8>,
        nonce: u64,
    ) -> Self {
        let hash = Self::derive_hash(&from, to.as_ref(), value, gas, gas_price, &input, nonce);
        Self {
            hash,
            from,
            to,
            value,
            gas,
            gas_price,
            input,
            nonce,
        }
    }

    /// Whether this transaction creates a contract.
    pub fn creates_contract(&self) -> bool {
        self.to.is_none()
    }

    fn derive_hash(
        from: &Address,
        to: Option<&Address>,
        value: u128,
        gas: u64,
        gas_price: u128,
        input: &[u8],
        nonce: u64,
    ) -> TxHash {
        let mut hasher = Hasher::new();
        hasher.update(b"STELE_TX");
        hasher.update(from.as_bytes());
        match to {
            Some(addr) => {
                hasher.update(&[1]);
                hasher.update(addr.as_bytes());
            }
            None => hasher.update(&[0]),
        }
        hasher.update(&value.to_le_bytes());
        hasher.update(&gas.to_le_bytes());
        hasher.update(&gas_price.to_le_bytes());
        hasher.update(&(input.len() as u64).to_le_bytes());
        hasher.update(input);
        hasher.update(&nonce.to_le_bytes());
        TxHash::new(hasher.finalize())
    }
}

/// Caller-supplied fields of `eth_sendTransaction`.
///
/// The node fills in the nonce from the sender's account and derives the
/// hash; callers never pick either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Asserted sender
    pub from: Address,
    /// Recipient; omit to create a contract
    #[serde(default)]
    pub to: Option<Address>,
    /// Transferred value
    #[serde(default, with = "encoding::hex_quantity")]
    pub value: u128,
    /// Gas allowance
    #[serde(default)]
    pub gas: u64,
    /// Gas price
    #[serde(default, rename = "gasPrice", with = "encoding::hex_quantity")]
    pub gas_price: u128,
    /// Opaque payload
    #[serde(default, with = "encoding::hex_bytes")]
    pub input: Vec<u8>,
}

/// A transaction as seen by lookups: pending entries carry no inclusion
/// fields, included entries carry all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    /// The transaction itself
    pub transaction: Transaction,
    /// Number of the including block, if included
    pub block_number: Option<u64>,
    /// Hash of the including block, if included
    pub block_hash: Option<BlockHash>,
    /// Position within the including block, if included
    pub transaction_index: Option<u64>,
}

impl TransactionView {
    /// View of a still-pending transaction.
    pub fn pending(transaction: Transaction) -> Self {
        Self {
            transaction,
            block_number: None,
            block_hash: None,
            transaction_index: None,
        }
    }

    /// View of an included transaction.
    pub fn included(
        transaction: Transaction,
        block_number: u64,
        block_hash: BlockHash,
        transaction_index: u64,
    ) -> Self {
        Self {
            transaction,
            block_number: Some(block_number),
            block_hash: Some(block_hash),
            transaction_index: Some(transaction_index),
        }
    }
}
