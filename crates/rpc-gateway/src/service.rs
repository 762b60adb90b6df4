//! Gateway service: HTTP transport around the dispatcher.
//!
//! Routes:
//! - `POST /` JSON-RPC
//! - `GET /health` liveness
//! - `GET /methods` registered methods with their parameter kinds
//! - `GET /metrics` dispatcher counters as JSON

use crate::dispatcher::RpcDispatcher;
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, GatewayMetrics, TracingLayer};
use crate::rpc::{strata_registry, StrataRpc};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use status_store::StatusQuery;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tracing::{error, info, warn};

type ServerHandle = JoinHandle<std::io::Result<()>>;

/// Node status RPC service
pub struct RpcService {
    config: GatewayConfig,
    dispatcher: Arc<RpcDispatcher>,
    metrics: Arc<GatewayMetrics>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<ServerHandle>,
    local_addr: Option<SocketAddr>,
}

impl RpcService {
    /// Validate config and build the method table. Fails on a bad config
    /// or a duplicate method name.
    pub fn new(config: GatewayConfig, state: Arc<dyn StatusQuery>) -> Result<Self, GatewayError> {
        config.validate()?;

        let registry = strata_registry()?;
        let metrics = Arc::new(GatewayMetrics::new());
        let rpc = StrataRpc::new(state, &config.chain);
        info!(
            methods = registry.len(),
            protocol_version = config.chain.protocol_version,
            block_time_ms = config.chain.block_time_ms,
            "Method registry built"
        );
        let dispatcher = Arc::new(RpcDispatcher::new(registry, rpc, Arc::clone(&metrics)));

        Ok(Self {
            config,
            dispatcher,
            metrics,
            shutdown_tx: None,
            server: None,
            local_addr: None,
        })
    }

    /// Bind the HTTP listener and start serving in the background.
    ///
    /// Returns the bound address, which differs from the configured one
    /// when port 0 was requested.
    pub async fn start(&mut self) -> Result<SocketAddr, GatewayError> {
        if self.server.is_some() {
            return Err(GatewayError::AlreadyStarted);
        }

        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = self.router();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(addr = %local_addr, "RPC server listening");
        self.shutdown_tx = Some(shutdown_tx);
        self.server = Some(server);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Wait until the server stops on its own (after `shutdown` or an error).
    pub async fn wait(&mut self) -> Result<(), GatewayError> {
        match self.server.take() {
            Some(server) => join_server(server).await,
            None => Ok(()),
        }
    }

    /// Trigger graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(&mut self) -> Result<(), GatewayError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let result = self.wait().await;
        info!("RPC server stopped");
        result
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn dispatcher(&self) -> Arc<RpcDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// HTTP router with the full middleware stack.
    pub fn router(&self) -> Router {
        let state = AppState {
            dispatcher: Arc::clone(&self.dispatcher),
            metrics: Arc::clone(&self.metrics),
        };

        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size))
            .layer(TracingLayer::new());

        Router::new()
            .route("/", post(handle_json_rpc))
            .route("/health", get(health_check))
            .route("/methods", get(method_catalog))
            .route("/metrics", get(metrics_json))
            .layer(middleware)
            .with_state(state)
    }
}

async fn join_server(server: ServerHandle) -> Result<(), GatewayError> {
    match server.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "HTTP server error");
            Err(GatewayError::Internal(e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "HTTP server task failed");
            Err(GatewayError::Internal(e.to_string()))
        }
    }
}

impl Drop for RpcService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            warn!("RpcService dropped without shutdown, stopping server");
            let _ = tx.send(());
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<RpcDispatcher>,
    metrics: Arc<GatewayMetrics>,
}

/// Every JSON-RPC outcome, errors included, is a 200 with a JSON body.
async fn handle_json_rpc(State(state): State<AppState>, body: Bytes) -> Response {
    let encoded = state.dispatcher.handle(&body);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        encoded,
    )
        .into_response()
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn method_catalog(State(state): State<AppState>) -> impl IntoResponse {
    let methods = state.dispatcher.registry().methods();
    Json(serde_json::Value::Array(methods.iter().map(|d| d.describe()).collect()))
}

async fn metrics_json(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}
