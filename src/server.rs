//! HTTP server exposing the aggregation store.
//!
//! This module provides an HTTP server that:
//! - Accepts raw CSV telemetry records via POST /event
//! - Serves the trailing-window aggregate via GET /stats
//! - Answers liveness probes via GET /health
//!
//! # Architecture
//!
//! ```text
//! Producer ──→ POST /event ──→ validator ──→ windowed store
//!                                                 │
//! Consumer ──→ GET /stats  ←── formatter ←── snapshot fold
//! ```

use crate::core::WindowedStore;
use crate::event::parse_record;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Trailing retention window for the store
    pub window: Duration,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(port: u16, window: Duration) -> Self {
        Self { port, window }
    }
}

/// Shared server state
pub struct ServerState {
    /// The single store instance for this process. Handlers share it by
    /// reference; tests build their own instance per server.
    store: WindowedStore,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            store: WindowedStore::with_window(config.window),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /event
///
/// Accepts one raw `"{timestampMs},{x},{y}"` record as the request body,
/// validates it, and merges it into the store. A record aged past the
/// window is accepted and silently dropped.
async fn save_event(State(state): State<Arc<ServerState>>, body: String) -> (StatusCode, String) {
    match parse_record(&body) {
        Ok(event) => {
            state.store.ingest(event, Utc::now().timestamp_millis());
            tracing::debug!("saved event: {body}");
            (
                StatusCode::ACCEPTED,
                "Successfully saved the data".to_string(),
            )
        }
        Err(e) => {
            tracing::debug!("rejected event: {e}");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// GET /stats
///
/// Folds the live buckets into a snapshot and renders the canonical
/// comma-separated form.
async fn stats(State(state): State<Arc<ServerState>>) -> String {
    state
        .store
        .snapshot(Utc::now().timestamp_millis())
        .to_string()
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config));

    let app = Router::new()
        .route("/health", get(health))
        .route("/event", post(save_event))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!(
        "Telemetry stats server listening on http://{} (window: {}ms)",
        actual_addr,
        config.window.as_millis()
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
