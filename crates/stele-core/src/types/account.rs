//! Accounts and contract records.

use crate::encoding;
use crate::types::ids::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balance and nonce of one address.
///
/// Accounts materialize implicitly: the first credit or nonce bump creates
/// the entry with zero defaults. The nonce counts transactions originated
/// by the address and only ever increases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Spendable balance
    #[serde(with = "encoding::hex_quantity")]
    pub balance: u128,
    /// Count of transactions originated by this address
    pub nonce: u64,
}

/// Stored record of a deployed contract.
///
/// Stele stores bytecode opaquely and never executes it; the storage map
/// exists for shape-compatibility with Ethereum tooling and stays empty
/// under current operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Opaque bytecode, the `input` of the creating transaction
    #[serde(with = "encoding::hex_bytes")]
    pub bytecode: Vec<u8>,
    /// Key-value storage, hex-encoded words
    #[serde(default)]
    pub storage: BTreeMap<String, String>,
    /// Address that sent the creating transaction
    pub creator: Address,
}

impl ContractRecord {
    /// Create a record for freshly deployed bytecode.
    pub fn new(bytecode: Vec<u8>, creator: Address) -> Self {
        Self {
            bytecode,
            storage: BTreeMap::new(),
            creator,
        }
    }
}
