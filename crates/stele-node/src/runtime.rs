//! The event loop itself.

use crate::context::NodeContext;
use crate::error::NodeError;
use crate::gossip::{Broadcast, GossipEnvelope, GossipMessage};
use crate::handle::{NodeCommand, NodeHandle};
use crate::producer;
use std::sync::Arc;
use std::time::Duration;
use stele_core::{NodeConfig, Transaction, TransactionView};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Queue depth for commands entering the loop.
const COMMAND_BUFFER: usize = 64;

/// Gas attributed to raw payload transactions.
const RAW_TX_GAS: u64 = 90_000;

/// One ledger node: an event loop exclusively owning a [`NodeContext`].
///
/// RPC commands, inbound gossip, and the production timer are all
/// serialized onto the loop, so nothing here ever runs concurrently with
/// anything else touching node state.
pub struct Node;

impl Node {
    /// Validate configuration, apply genesis, and start the loop.
    ///
    /// `broadcast` is the outbound half of the transport boundary and
    /// `inbound` the queue its deliveries arrive on. Returns the handle
    /// other tasks use to reach the node, plus the loop's join handle for
    /// orderly shutdown.
    pub fn spawn(
        config: NodeConfig,
        broadcast: Arc<dyn Broadcast>,
        inbound: mpsc::UnboundedReceiver<GossipEnvelope>,
    ) -> Result<(NodeHandle, JoinHandle<()>), NodeError> {
        let ctx = NodeContext::new(config)?;
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = NodeHandle { commands };
        let loop_handle = handle.clone();
        let task = tokio::spawn(run(ctx, loop_handle, command_rx, broadcast, inbound));
        Ok((handle, task))
    }
}

async fn run(
    mut ctx: NodeContext,
    handle: NodeHandle,
    mut commands: mpsc::Receiver<NodeCommand>,
    broadcast: Arc<dyn Broadcast>,
    mut inbound: mpsc::UnboundedReceiver<GossipEnvelope>,
) {
    let interval_secs = ctx.config.block_interval_secs;
    let timer_enabled = interval_secs > 0;
    let mut timer = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut inbound_open = true;

    info!(
        interval_secs,
        timer = timer_enabled,
        "node event loop running"
    );
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    if handle_command(&mut ctx, &handle, &broadcast, command).await {
                        break;
                    }
                }
                None => break,
            },
            envelope = inbound.recv(), if inbound_open => match envelope {
                Some(envelope) => handle_gossip(&mut ctx, envelope),
                None => {
                    // Transport dropped its sender; keep serving RPC.
                    inbound_open = false;
                }
            },
            _ = timer.tick(), if timer_enabled => {
                if let Some(block) = producer::produce(&mut ctx) {
                    publish(&broadcast, &GossipMessage::Block(block)).await;
                }
            }
        }
    }
    info!("node event loop stopped");
}

/// Handle one command; returns true when the loop should stop.
async fn handle_command(
    ctx: &mut NodeContext,
    handle: &NodeHandle,
    broadcast: &Arc<dyn Broadcast>,
    command: NodeCommand,
) -> bool {
    match command {
        NodeCommand::Height(reply) => {
            let height = ctx.ledger.head().map(|head| head.number).unwrap_or(0);
            let _ = reply.send(height);
        }
        NodeCommand::BlockByNumber(number, reply) => {
            let _ = reply.send(ctx.ledger.block_by_number(number).cloned());
        }
        NodeCommand::Transaction(hash, reply) => {
            let view = ctx.ledger.transaction(&hash).or_else(|| {
                ctx.pool
                    .get(&hash)
                    .map(|tx| TransactionView::pending(tx.clone()))
            });
            let _ = reply.send(view);
        }
        NodeCommand::Receipt(hash, reply) => {
            let _ = reply.send(ctx.ledger.receipt(&hash));
        }
        NodeCommand::Account(address, reply) => {
            let _ = reply.send(ctx.ledger.account(&address).unwrap_or_default());
        }
        NodeCommand::Code(address, reply) => {
            let code = ctx
                .ledger
                .contract(&address)
                .map(|record| record.bytecode.clone())
                .unwrap_or_default();
            let _ = reply.send(code);
        }
        NodeCommand::Accounts(reply) => {
            let _ = reply.send(ctx.registry.authorities().to_vec());
        }
        NodeCommand::SubmitTransaction(request, reply) => {
            let nonce = ctx
                .ledger
                .account(&request.from)
                .map(|account| account.nonce)
                .unwrap_or(0);
            let tx = Transaction::new(
                request.from,
                request.to,
                request.value,
                request.gas,
                request.gas_price,
                request.input,
                nonce,
            );
            let hash = tx.hash;
            let fresh = ctx.pool.submit(tx.clone());
            // The caller gets the hash immediately; inclusion is observed
            // by polling for the receipt.
            let _ = reply.send(hash);
            if fresh {
                publish(broadcast, &GossipMessage::Transaction(tx)).await;
                // Production is deferred to the back of the queue so
                // submissions already in flight can share the block.
                if handle
                    .commands
                    .try_send(NodeCommand::Produce(None))
                    .is_err()
                {
                    debug!("command queue full, leaving production to the timer");
                }
            }
        }
        NodeCommand::SubmitRaw(raw, reply) => {
            let sender = ctx.config.raw_transaction_sender();
            let nonce = ctx
                .ledger
                .account(&sender)
                .map(|account| account.nonce)
                .unwrap_or(0);
            let tx = Transaction::new(sender, None, 0, RAW_TX_GAS, 0, raw, nonce);
            let hash = tx.hash;
            if ctx.pool.submit(tx.clone()) {
                publish(broadcast, &GossipMessage::Transaction(tx)).await;
            }
            // Raw submissions produce synchronously before replying.
            if let Some(block) = producer::produce(ctx) {
                publish(broadcast, &GossipMessage::Block(block)).await;
            }
            let _ = reply.send(hash);
        }
        NodeCommand::Produce(reply) => {
            if let Some(block) = producer::produce(ctx) {
                publish(broadcast, &GossipMessage::Block(block)).await;
            }
            if let Some(reply) = reply {
                let _ = reply.send(());
            }
        }
        NodeCommand::Shutdown(reply) => {
            let _ = reply.send(());
            return true;
        }
    }
    false
}

fn handle_gossip(ctx: &mut NodeContext, envelope: GossipEnvelope) {
    match GossipMessage::decode(&envelope.payload) {
        Ok(GossipMessage::Block(block)) => {
            producer::validate_and_apply(ctx, block);
        }
        Ok(GossipMessage::Transaction(tx)) => {
            // Remote transactions join the pool but never trigger
            // production here: the producing authority's own timer is
            // responsible for sealing them.
            if ctx.ledger.transaction(&tx.hash).is_none() {
                ctx.pool.submit(tx);
            }
        }
        Ok(GossipMessage::Consensus(payload)) => {
            debug!(topic = %envelope.topic, %payload, "consensus message received");
        }
        Err(err) => {
            warn!(topic = %envelope.topic, %err, "undecodable gossip payload dropped");
        }
    }
}

async fn publish(broadcast: &Arc<dyn Broadcast>, message: &GossipMessage) {
    let payload = match message.encode() {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%err, "failed to encode gossip message");
            return;
        }
    };
    if let Err(err) = broadcast.publish(message.topic(), payload).await {
        // Local progress never waits on the network.
        warn!(topic = message.topic(), %err, "broadcast failed");
    }
}
