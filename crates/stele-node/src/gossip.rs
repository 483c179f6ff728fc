//! Broadcast seam, topics, envelopes, and the loopback hub.
//!
//! The real transport (peer discovery, streams, encryption, topic
//! subscription) lives outside this crate. The node only needs two
//! things from it: publishing an encoded message on a named topic, and
//! an inbound queue of envelopes drained by the event loop. Delivery is
//! best-effort and at-least-once, with no ordering across peers; publish
//! failures never block local progress.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stele_core::{Block, Transaction};
use tokio::sync::{mpsc, Mutex};
use tracing::trace;

/// Topic carrying sealed block announcements.
pub const TOPIC_BLOCKS: &str = "stele.blocks";
/// Topic carrying pending transaction announcements.
pub const TOPIC_TRANSACTIONS: &str = "stele.transactions";
/// Topic carrying generic consensus control messages.
pub const TOPIC_CONSENSUS: &str = "stele.consensus";

/// A publish failure, reported to the caller and then forgotten.
#[derive(Debug, Clone, thiserror::Error)]
#[error("gossip publish failed: {message}")]
pub struct GossipError {
    /// What went wrong
    pub message: String,
}

impl GossipError {
    /// Create a publish failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A raw message as it crosses the transport boundary.
#[derive(Debug, Clone)]
pub struct GossipEnvelope {
    /// Topic the message was published on
    pub topic: String,
    /// Encoded [`GossipMessage`]
    pub payload: Vec<u8>,
}

/// Typed messages exchanged between nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GossipMessage {
    /// A sealed block
    Block(Block),
    /// A pending transaction
    Transaction(Transaction),
    /// Consensus control payload, currently opaque
    Consensus(serde_json::Value),
}

impl GossipMessage {
    /// The topic this message belongs on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Block(_) => TOPIC_BLOCKS,
            Self::Transaction(_) => TOPIC_TRANSACTIONS,
            Self::Consensus(_) => TOPIC_CONSENSUS,
        }
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, GossipError> {
        serde_json::to_vec(self).map_err(|err| GossipError::new(err.to_string()))
    }

    /// Decode from the wire.
    pub fn decode(payload: &[u8]) -> Result<Self, GossipError> {
        serde_json::from_slice(payload).map_err(|err| GossipError::new(err.to_string()))
    }
}

/// Outbound half of the transport boundary.
#[async_trait]
pub trait Broadcast: Send + Sync {
    /// Publish an encoded message on a topic, best-effort.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), GossipError>;
}

/// Broadcast for a node running without any transport attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcast;

#[async_trait]
impl Broadcast for NoopBroadcast {
    async fn publish(&self, topic: &str, _payload: Vec<u8>) -> Result<(), GossipError> {
        trace!(topic, "no transport attached, dropping broadcast");
        Ok(())
    }
}

type PeerMap = HashMap<usize, mpsc::UnboundedSender<GossipEnvelope>>;

/// In-process pubsub hub for tests and simulation.
///
/// Every joined peer sees every other peer's publishes on its inbound
/// queue; the publisher never hears its own messages back. Peers whose
/// queue is gone are skipped silently, matching the best-effort contract.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHub {
    peers: Arc<Mutex<PeerMap>>,
    next_id: Arc<AtomicUsize>,
}

impl LoopbackHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the hub, receiving a publisher and the peer's inbound queue.
    pub async fn join(&self) -> (LoopbackPeer, mpsc::UnboundedReceiver<GossipEnvelope>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        self.peers.lock().await.insert(id, sender);
        (
            LoopbackPeer {
                id,
                peers: self.peers.clone(),
            },
            receiver,
        )
    }
}

/// A joined peer's outbound half.
#[derive(Debug, Clone)]
pub struct LoopbackPeer {
    id: usize,
    peers: Arc<Mutex<PeerMap>>,
}

#[async_trait]
impl Broadcast for LoopbackPeer {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), GossipError> {
        let peers = self.peers.lock().await;
        for (peer_id, sender) in peers.iter() {
            if *peer_id == self.id {
                continue;
            }
            let _ = sender.send(GossipEnvelope {
                topic: topic.to_string(),
                payload: payload.clone(),
            });
        }
        Ok(())
    }
}
