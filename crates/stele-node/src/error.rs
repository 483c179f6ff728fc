//! Node error type.

use stele_core::CoreError;
use stele_ledger::LedgerError;

/// Failures surfacing from the node runtime.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NodeError {
    /// The event loop is gone; the node is shutting down
    #[error("node command channel closed")]
    ChannelClosed,

    /// Invalid configuration at startup
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Chain mutation rejected
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
