//! Axum-based RPC server.

use crate::error::RpcError;
use crate::handlers::{dispatch, RpcRequest};
use crate::registry::BallotRegistry;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub listen_addr: SocketAddr,
    /// Where ballot snapshots are kept; `None` keeps everything in memory.
    pub state_dir: Option<PathBuf>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 7070)),
            state_dir: None,
        }
    }
}

pub struct RpcServer {
    config: RpcConfig,
    registry: Arc<BallotRegistry>,
}

impl RpcServer {
    /// Build a server, loading stored ballots when a state directory is set.
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let registry = match &config.state_dir {
            Some(dir) => BallotRegistry::open(dir)?,
            None => BallotRegistry::in_memory(),
        };
        Ok(Self::with_registry(config, Arc::new(registry)))
    }

    pub fn with_registry(config: RpcConfig, registry: Arc<BallotRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn registry(&self) -> &Arc<BallotRegistry> {
        &self.registry
    }

    pub fn router(&self) -> Router {
        router(self.registry.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn start(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let addr = listener
            .local_addr()
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("ballot node listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("ballot node stopped");
        Ok(())
    }
}

pub fn router(registry: Arc<BallotRegistry>) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/health", get(health_handler))
        .with_state(registry)
}

async fn rpc_handler(
    State(registry): State<Arc<BallotRegistry>>,
    Json(request): Json<RpcRequest>,
) -> Json<Value> {
    match dispatch(&registry, &request.action, request.params).await {
        Ok(result) => Json(json!({ "result": result })),
        Err(e) => {
            warn!(action = %request.action, code = e.code(), "rpc error: {e}");
            Json(json!({ "error": e.to_string(), "code": e.code() }))
        }
    }
}

async fn health_handler(State(registry): State<Arc<BallotRegistry>>) -> Json<Value> {
    Json(json!({ "status": "ok", "ballots": registry.len().await }))
}
