//! Stele Node - the runtime tying ledger, pool, and gossip together.
//!
//! One tokio task per node owns every piece of mutable consensus state
//! (chain, accounts, pool, rotation cursor) inside a [`NodeContext`] and
//! serializes all access through channels: RPC calls arrive as commands
//! via [`NodeHandle`], peer messages arrive on an inbound gossip queue,
//! and a production timer ticks in the same `select!` loop. Nothing else
//! can reach the state, so the ledger needs no locks.
//!
//! Outbound messages go through the [`gossip::Broadcast`] trait; the real
//! pubsub transport lives outside this crate, and an in-process
//! [`gossip::LoopbackHub`] stands in for it in tests and simulations.

#![forbid(unsafe_code)]

/// Event-loop-owned node state
pub mod context;

/// Node error type
pub mod error;

/// Broadcast seam, topics, envelopes, and the loopback hub
pub mod gossip;

/// Typed async front for the event loop
pub mod handle;

/// Block production and validation paths
pub mod producer;

/// The event loop itself
pub mod runtime;

pub use context::NodeContext;
pub use error::NodeError;
pub use gossip::{Broadcast, GossipEnvelope, GossipError, GossipMessage, LoopbackHub, NoopBroadcast};
pub use handle::NodeHandle;
pub use runtime::Node;
