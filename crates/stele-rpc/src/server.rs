//! Axum HTTP server for the gateway.

use crate::api::NodeApi;
use crate::dispatch::handle_payload;
use anyhow::Result;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use stele_core::NodeConfig;

/// Shared state for the Axum handlers.
#[derive(Clone)]
struct GatewayState {
    api: Arc<dyn NodeApi>,
    config: Arc<NodeConfig>,
}

/// The JSON-RPC HTTP server.
///
/// One POST endpoint carrying every method, plus a `GET /health` liveness
/// probe reporting the chain height.
pub struct RpcServer {
    api: Arc<dyn NodeApi>,
    config: NodeConfig,
}

impl RpcServer {
    /// Create a server front for a node.
    pub fn new(api: Arc<dyn NodeApi>, config: NodeConfig) -> Self {
        Self { api, config }
    }

    /// Build the router; exposed so tests can drive it without a socket.
    pub fn router(&self) -> Router {
        let state = GatewayState {
            api: self.api.clone(),
            config: Arc::new(self.config.clone()),
        };
        Router::new()
            .route("/", post(rpc_endpoint))
            .route("/health", get(health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(state)
    }

    /// Bind the configured listen address and serve until the process
    /// shuts down.
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.config.rpc_listen.parse()?;
        let app = self.router();
        info!("rpc listening on {addr}");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// The JSON-RPC endpoint.
///
/// Takes the body as a string so unparseable payloads become structured
/// -32700 responses instead of framework-level rejections.
async fn rpc_endpoint(State(state): State<GatewayState>, body: String) -> Json<Value> {
    Json(handle_payload(state.api.as_ref(), &state.config, &body).await)
}

/// Liveness probe.
async fn health(State(state): State<GatewayState>) -> Json<Value> {
    let height = state.api.height().await.ok();
    Json(json!({
        "status": "ok",
        "height": height,
        "clientVersion": state.config.client_version,
    }))
}
