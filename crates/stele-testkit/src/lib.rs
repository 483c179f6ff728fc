//! Stele Testkit - fixtures and the multi-node harness.
//!
//! Deterministic addresses, ready-made network configurations, and a
//! [`TestNetwork`] that wires several nodes through one in-process
//! loopback hub. Consumed as a dev-dependency by the crates' integration
//! tests; nothing here belongs in production builds.

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;
use stele_core::{Address, NodeConfig, Receipt, TransactionRequest, TxHash};
use stele_node::gossip::{GossipEnvelope, GossipMessage, LoopbackHub, LoopbackPeer};
use stele_node::{Broadcast, Node, NodeHandle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Attempts made while polling for an expected state.
pub const POLL_ATTEMPTS: usize = 50;

/// Delay between polling attempts.
pub const POLL_DELAY: Duration = Duration::from_millis(20);

/// Deterministic address for a label.
pub fn address(label: &str) -> Address {
    Address::derive(label.as_bytes())
}

/// Deterministic ordered authority set of a given size.
pub fn authorities(count: usize) -> Vec<Address> {
    (0..count)
        .map(|i| address(&format!("authority-{i}")))
        .collect()
}

/// Network-wide configuration for tests: timer disabled so production
/// happens only when a test submits or mines.
pub fn network_config(authority_count: usize) -> NodeConfig {
    NodeConfig {
        authorities: authorities(authority_count),
        block_interval_secs: 0,
        rpc_listen: "127.0.0.1:0".to_string(),
        ..NodeConfig::default()
    }
}

/// A value transfer request between two labeled addresses.
pub fn transfer_request(from: &str, to: &str, value: u128) -> TransactionRequest {
    TransactionRequest {
        from: address(from),
        to: Some(address(to)),
        value,
        gas: 21_000,
        gas_price: 1,
        input: Vec::new(),
    }
}

/// One spawned node.
pub struct TestNode {
    /// Interface to the node's event loop
    pub handle: NodeHandle,
    /// The loop task, for shutdown assertions
    pub task: JoinHandle<()>,
}

/// Several nodes joined through one loopback hub.
pub struct TestNetwork {
    /// The hub itself, so tests can join extra peers and inject traffic
    pub hub: LoopbackHub,
    /// Spawned nodes in join order
    pub nodes: Vec<TestNode>,
}

impl TestNetwork {
    /// Spawn `node_count` identically configured nodes over a fresh hub.
    pub async fn spawn(node_count: usize, authority_count: usize) -> Self {
        let config = network_config(authority_count);
        let hub = LoopbackHub::new();
        let mut nodes = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            let (peer, inbound) = hub.join().await;
            let (handle, task) = Node::spawn(config.clone(), Arc::new(peer), inbound)
                .unwrap_or_else(|err| panic!("node spawn failed: {err}"));
            nodes.push(TestNode { handle, task });
        }
        Self { hub, nodes }
    }

    /// Join the hub as a bare peer, for injecting crafted traffic.
    pub async fn observer(&self) -> (LoopbackPeer, mpsc::UnboundedReceiver<GossipEnvelope>) {
        self.hub.join().await
    }

    /// Publish a typed message into the network from outside any node.
    pub async fn inject(&self, peer: &LoopbackPeer, message: &GossipMessage) {
        let payload = message.encode().unwrap_or_else(|err| panic!("encode: {err}"));
        peer.publish(message.topic(), payload)
            .await
            .unwrap_or_else(|err| panic!("publish: {err}"));
    }
}

/// Poll until a node reaches a height, with fixed attempts and delay.
pub async fn wait_for_height(handle: &NodeHandle, target: u64) -> bool {
    for _ in 0..POLL_ATTEMPTS {
        if let Ok(height) = handle.height().await {
            if height >= target {
                return true;
            }
        }
        tokio::time::sleep(POLL_DELAY).await;
    }
    false
}

/// Poll until a receipt exists, with fixed attempts and delay.
pub async fn wait_for_receipt(handle: &NodeHandle, hash: TxHash) -> Option<Receipt> {
    for _ in 0..POLL_ATTEMPTS {
        if let Ok(Some(receipt)) = handle.receipt(hash).await {
            return Some(receipt);
        }
        tokio::time::sleep(POLL_DELAY).await;
    }
    None
}
