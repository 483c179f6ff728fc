//! Post-inclusion receipts.

use crate::types::ids::{Address, BlockHash, TxHash};
use serde::{Deserialize, Serialize};

/// Record of a transaction's inclusion in the chain.
///
/// Receipts only exist once the transaction is in an applied block;
/// lookups before that return nothing so clients can poll. Since no
/// bytecode runs, every included transaction succeeds and `status` is
/// always 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the included transaction
    pub transaction_hash: TxHash,
    /// Position within the including block
    pub transaction_index: u64,
    /// Number of the including block
    pub block_number: u64,
    /// Hash of the including block
    pub block_hash: BlockHash,
    /// Sender
    pub from: Address,
    /// Recipient, if any
    pub to: Option<Address>,
    /// Address of the created contract, for creation transactions
    pub contract_address: Option<Address>,
    /// Gas allowance of the transaction (informational)
    pub gas_used: u64,
    /// Inclusion outcome; always 1
    pub status: u64,
}
