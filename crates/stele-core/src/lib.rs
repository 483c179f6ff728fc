//! Stele Core - ledger data model and codecs
//!
//! Foundational types shared by every Stele crate: addresses and content
//! hashes, the block/transaction/account/contract records, Ethereum-style
//! hex encodings, node configuration, and the unified error type.
//!
//! This crate is pure data plus deterministic codecs. It holds no runtime
//! state and performs no I/O beyond reading a configuration file.

#![forbid(unsafe_code)]

/// Unified error handling
pub mod error;

/// SHA-256 content addressing
pub mod hash;

/// Ethereum-style hex encodings for quantities and opaque data
pub mod encoding;

/// Node configuration (toml file + programmatic presets)
pub mod config;

/// Ledger record types
pub mod types;

pub use config::NodeConfig;
pub use error::{CoreError, Result};
pub use types::account::{Account, ContractRecord};
pub use types::block::Block;
pub use types::ids::{contract_address, Address, BlockHash, TxHash};
pub use types::receipt::Receipt;
pub use types::transaction::{Transaction, TransactionRequest, TransactionView};
