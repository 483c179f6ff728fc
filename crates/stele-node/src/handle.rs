//! Typed async front for the event loop.
//!
//! A [`NodeHandle`] is the only way code outside the event loop reaches
//! node state: every call packs a command with a oneshot responder, sends
//! it down the loop's queue, and awaits the answer. Handles are cheap to
//! clone and safe to share across tasks.

use crate::error::NodeError;
use async_trait::async_trait;
use stele_core::{
    Account, Address, Block, Receipt, TransactionRequest, TransactionView, TxHash,
};
use stele_rpc::{NodeApi, RpcError};
use tokio::sync::{mpsc, oneshot};

/// Commands crossing into the event loop.
#[derive(Debug)]
pub(crate) enum NodeCommand {
    Height(oneshot::Sender<u64>),
    BlockByNumber(u64, oneshot::Sender<Option<Block>>),
    Transaction(TxHash, oneshot::Sender<Option<TransactionView>>),
    Receipt(TxHash, oneshot::Sender<Option<Receipt>>),
    Account(Address, oneshot::Sender<Account>),
    Code(Address, oneshot::Sender<Vec<u8>>),
    Accounts(oneshot::Sender<Vec<Address>>),
    /// Pool a transaction and reply with its hash before production runs
    SubmitTransaction(TransactionRequest, oneshot::Sender<TxHash>),
    /// Pool a raw payload and reply only after a production round
    SubmitRaw(Vec<u8>, oneshot::Sender<TxHash>),
    /// Run one production round now
    Produce(Option<oneshot::Sender<()>>),
    /// Stop the loop
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable async interface to one node's event loop.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    pub(crate) commands: mpsc::Sender<NodeCommand>,
}

impl NodeHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> NodeCommand,
    ) -> Result<T, NodeError> {
        let (reply, answer) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| NodeError::ChannelClosed)?;
        answer.await.map_err(|_| NodeError::ChannelClosed)
    }

    /// Number of the chain head.
    pub async fn height(&self) -> Result<u64, NodeError> {
        self.request(NodeCommand::Height).await
    }

    /// Block at a position.
    pub async fn block_by_number(&self, number: u64) -> Result<Option<Block>, NodeError> {
        self.request(|reply| NodeCommand::BlockByNumber(number, reply))
            .await
    }

    /// Transaction lookup, included or pending.
    pub async fn transaction(&self, hash: TxHash) -> Result<Option<TransactionView>, NodeError> {
        self.request(|reply| NodeCommand::Transaction(hash, reply))
            .await
    }

    /// Receipt lookup; `None` until included.
    pub async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, NodeError> {
        self.request(|reply| NodeCommand::Receipt(hash, reply)).await
    }

    /// Account state, zero-valued when untouched.
    pub async fn account(&self, address: Address) -> Result<Account, NodeError> {
        self.request(|reply| NodeCommand::Account(address, reply))
            .await
    }

    /// Stored bytecode, empty for non-contracts.
    pub async fn code(&self, address: Address) -> Result<Vec<u8>, NodeError> {
        self.request(|reply| NodeCommand::Code(address, reply)).await
    }

    /// The authority set.
    pub async fn accounts(&self) -> Result<Vec<Address>, NodeError> {
        self.request(NodeCommand::Accounts).await
    }

    /// Submit a transaction; returns its hash before inclusion.
    pub async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, NodeError> {
        self.request(|reply| NodeCommand::SubmitTransaction(request, reply))
            .await
    }

    /// Submit a raw payload; returns after a production round.
    pub async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TxHash, NodeError> {
        self.request(|reply| NodeCommand::SubmitRaw(raw, reply))
            .await
    }

    /// Force one production round and wait for it.
    pub async fn mine(&self) -> Result<(), NodeError> {
        self.request(|reply| NodeCommand::Produce(Some(reply)))
            .await
    }

    /// Stop the event loop.
    pub async fn shutdown(&self) -> Result<(), NodeError> {
        self.request(NodeCommand::Shutdown).await
    }
}

fn internal(err: NodeError) -> RpcError {
    RpcError::internal(err.to_string())
}

#[async_trait]
impl NodeApi for NodeHandle {
    async fn height(&self) -> Result<u64, RpcError> {
        NodeHandle::height(self).await.map_err(internal)
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<Block>, RpcError> {
        NodeHandle::block_by_number(self, number)
            .await
            .map_err(internal)
    }

    async fn transaction(&self, hash: TxHash) -> Result<Option<TransactionView>, RpcError> {
        NodeHandle::transaction(self, hash).await.map_err(internal)
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RpcError> {
        NodeHandle::receipt(self, hash).await.map_err(internal)
    }

    async fn account(&self, address: Address) -> Result<Account, RpcError> {
        NodeHandle::account(self, address).await.map_err(internal)
    }

    async fn code(&self, address: Address) -> Result<Vec<u8>, RpcError> {
        NodeHandle::code(self, address).await.map_err(internal)
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        NodeHandle::accounts(self).await.map_err(internal)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, RpcError> {
        NodeHandle::send_transaction(self, request)
            .await
            .map_err(internal)
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TxHash, RpcError> {
        NodeHandle::send_raw_transaction(self, raw)
            .await
            .map_err(internal)
    }

    async fn mine(&self) -> Result<(), RpcError> {
        NodeHandle::mine(self).await.map_err(internal)
    }
}
