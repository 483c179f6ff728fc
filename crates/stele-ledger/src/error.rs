//! Error taxonomy for chain mutation.
//!
//! Lookups never error: absent keys return `None` so polling clients can
//! distinguish "not yet" from "broken". Errors are reserved for rejected
//! chain mutations.

use stele_core::{BlockHash, TxHash};

/// Why a block was not appended.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Block number does not extend the current chain
    #[error("block {number} does not extend chain at height {height}")]
    HeightMismatch {
        /// Number carried by the rejected block
        number: u64,
        /// Height the chain actually has
        height: u64,
    },

    /// Parent hash does not match the head
    #[error("block {number} parent hash does not match head")]
    ParentMismatch {
        /// Number carried by the rejected block
        number: u64,
    },

    /// The block hash is already present in the chain
    #[error("block {hash} already applied")]
    KnownBlock {
        /// Hash of the redelivered block
        hash: BlockHash,
    },

    /// A transaction in the block was already included earlier
    #[error("transaction {hash} already included")]
    DuplicateTransaction {
        /// Hash of the duplicated transaction
        hash: TxHash,
    },

    /// An authority registry cannot be built from nothing
    #[error("authority set is empty")]
    EmptyAuthoritySet,
}

/// Standard Result type for ledger mutations
pub type Result<T> = std::result::Result<T, LedgerError>;
