//! The stele-node binary.
//!
//! Wires a node event loop to the JSON-RPC server, with configuration
//! from a toml file plus CLI overrides. Without a transport collaborator
//! attached, broadcasts are dropped and the inbound queue stays silent;
//! the node still produces and serves its own chain.

use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stele_core::NodeConfig;
use stele_node::{Node, NoopBroadcast};
use stele_rpc::RpcServer;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stele-node", about = "Proof-of-authority ledger node")]
struct Cli {
    /// Path to a toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the single-authority development chain
    #[arg(long)]
    dev: bool,

    /// Override the RPC listen address
    #[arg(long)]
    rpc_listen: Option<String>,

    /// Override the block production interval in seconds (0 disables)
    #[arg(long)]
    block_interval: Option<u64>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<NodeConfig> {
        let mut config = match (&self.config, self.dev) {
            (Some(path), _) => NodeConfig::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            (None, _) => {
                info!("no configuration file given, using the development preset");
                NodeConfig::dev()
            }
        };
        if let Some(listen) = self.rpc_listen {
            config.rpc_listen = listen;
        }
        if let Some(interval) = self.block_interval {
            config.block_interval_secs = interval;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        chain_id = config.chain_id,
        authorities = config.authorities.len(),
        rpc = %config.rpc_listen,
        "starting stele node"
    );

    // No transport collaborator in the standalone binary: keep the sender
    // alive so the inbound branch stays quiet instead of closing.
    let (_inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (handle, node_task) =
        Node::spawn(config.clone(), Arc::new(NoopBroadcast), inbound_rx)?;

    let rpc = RpcServer::new(Arc::new(handle.clone()), config);
    let rpc_task = tokio::spawn(async move {
        if let Err(err) = rpc.serve().await {
            error!("rpc server failed: {err:#}");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("listening for shutdown signal")?;
    info!("shutdown signal received");

    // Stop the production timer and loop first, then the HTTP front.
    if handle.shutdown().await.is_err() {
        error!("node loop was already gone at shutdown");
    }
    rpc_task.abort();
    node_task.await.ok();
    Ok(())
}
