//! The seam between gateway and node runtime.
//!
//! The gateway is compiled against this trait rather than the node crate,
//! keeping the dependency arrow pointing from runtime to gateway. The node
//! handle implements it by relaying commands into the event loop; tests
//! implement it with canned state.

use crate::error::RpcError;
use async_trait::async_trait;
use stele_core::{
    Account, Address, Block, Receipt, TransactionRequest, TransactionView, TxHash,
};

/// Everything the JSON-RPC gateway needs from a node.
#[async_trait]
pub trait NodeApi: Send + Sync + 'static {
    /// Number of the chain head.
    async fn height(&self) -> Result<u64, RpcError>;

    /// Block at a position, if present.
    async fn block_by_number(&self, number: u64) -> Result<Option<Block>, RpcError>;

    /// Transaction lookup covering both included and pending entries.
    async fn transaction(&self, hash: TxHash) -> Result<Option<TransactionView>, RpcError>;

    /// Receipt lookup; `None` until the transaction is included.
    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RpcError>;

    /// Account state; zero-valued for untouched addresses.
    async fn account(&self, address: Address) -> Result<Account, RpcError>;

    /// Stored bytecode; empty for non-contract addresses.
    async fn code(&self, address: Address) -> Result<Vec<u8>, RpcError>;

    /// The authority set.
    async fn accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// Pool a caller-described transaction, trigger production
    /// asynchronously, and return its hash immediately.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, RpcError>;

    /// Pool an opaque payload attributed to the configured default sender
    /// and produce a block before returning.
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TxHash, RpcError>;

    /// Force one production round, returning once it completed.
    async fn mine(&self) -> Result<(), RpcError>;
}
