//! Stele RPC - the Ethereum-style JSON-RPC gateway.
//!
//! A stateless dispatcher in front of a node: requests arrive as
//! JSON-RPC 2.0 over HTTP POST, get mapped by method name onto the
//! [`NodeApi`] trait, and results are rendered with Ethereum's hex
//! conventions. The gateway holds no consensus state of its own; every
//! read and write goes through the node handle implementing [`NodeApi`].
//!
//! The [`payload`] module carries the client-side convention for tagging
//! opaque transaction inputs. It is deliberately exported here and not in
//! the ledger: the ledger core never interprets payload bytes.

#![forbid(unsafe_code)]

/// The seam between gateway and node runtime
pub mod api;

/// Method-name dispatch and JSON shaping
pub mod dispatch;

/// JSON-RPC error codes and the gateway error type
pub mod error;

/// Client-boundary tagged payload codec
pub mod payload;

/// JSON-RPC 2.0 request/response envelopes
pub mod protocol;

/// Axum HTTP server
pub mod server;

pub use api::NodeApi;
pub use error::RpcError;
pub use payload::TaggedPayload;
pub use protocol::{ErrorObject, RpcRequest, RpcResponse};
pub use server::RpcServer;
