//! Stele Ledger - the chain state machine.
//!
//! Three owned, lock-free components, meant to live inside a single node
//! event loop:
//!
//! - [`LedgerState`]: append-only block chain plus the account, contract,
//!   and transaction indices derived from it. All chain invariants are
//!   enforced at its [`LedgerState::apply_block`] choke point.
//! - [`AuthorityRegistry`]: the fixed validator set and the round-robin
//!   cursor picking whose turn it is to produce.
//! - [`TxPool`]: submitted-but-not-yet-included transactions in insertion
//!   order.
//!
//! Nothing here performs I/O or talks to peers; producing, validating,
//! and gossiping live in the node runtime crate.

#![forbid(unsafe_code)]

/// Error taxonomy for chain mutation
pub mod error;

/// Round-robin authority rotation
pub mod authority;

/// Pending transaction pool
pub mod pool;

/// Chain, account, and contract state
pub mod state;

pub use authority::AuthorityRegistry;
pub use error::{LedgerError, Result};
pub use pool::TxPool;
pub use state::LedgerState;
