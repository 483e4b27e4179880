use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::engine::StateStore;

/// Response for the /v1/ping endpoint
#[derive(Serialize)]
struct PingResponse {
    status: String,
}

/// Response for the /v1/status endpoint
#[derive(Serialize)]
struct StatusResponse {
    name: String,
    version: String,
    hostname: String,
    update_interval_secs: u64,
    discovery_interval_secs: u64,
    discovery: Option<DiscoveryStatus>,
}

/// Summary of the latest discovery cycle, `null` until one has run.
#[derive(Serialize)]
struct DiscoveryStatus {
    hubs: usize,
    devices: usize,
    metrics: usize,
    discovered_at: DateTime<Utc>,
}

/// Request body for PUT /v1/intervals. Absent fields leave the current
/// value in place.
#[derive(Debug, Deserialize)]
struct IntervalsRequest {
    update_secs: Option<u64>,
    discovery_secs: Option<u64>,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    version: &'static str,
    store: Arc<StateStore>,
}

/// Handler for GET /v1/ping
#[tracing::instrument]
async fn ping() -> impl IntoResponse {
    tracing::debug!("Handling /v1/ping request");
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Handler for GET /v1/status
#[tracing::instrument(skip(state))]
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Handling /v1/status request");

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    let discovery = state.store.topology().map(|snapshot| DiscoveryStatus {
        hubs: snapshot.counts.hubs,
        devices: snapshot.counts.devices,
        metrics: snapshot.counts.metrics,
        discovered_at: snapshot.discovered_at,
    });

    (
        StatusCode::OK,
        Json(StatusResponse {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: state.version.to_string(),
            hostname,
            update_interval_secs: state.store.update_interval().as_secs(),
            discovery_interval_secs: state.store.discovery_interval().as_secs(),
            discovery,
        }),
    )
}

/// Handler for PUT /v1/intervals
#[tracing::instrument(skip(state))]
async fn put_intervals(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntervalsRequest>,
) -> impl IntoResponse {
    tracing::debug!("Handling /v1/intervals request");

    if let Some(secs) = req.update_secs {
        state.store.set_update_interval(Duration::from_secs(secs));
    }
    if let Some(secs) = req.discovery_secs {
        state.store.set_discovery_interval(Duration::from_secs(secs));
    }

    StatusCode::NO_CONTENT
}

/// Create the API router with all endpoints
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/status", get(status))
        .route("/v1/intervals", put(put_intervals))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
///
/// This function will bind to the specified address and serve the API endpoints.
/// It will run until the provided shutdown signal is triggered.
///
/// # Arguments
/// * `listen` - The IP address to listen on (e.g., "127.0.0.1")
/// * `port` - The port to listen on (e.g., 8565)
/// * `store` - Shared daemon state backing /v1/status and /v1/intervals
/// * `shutdown_rx` - A oneshot receiver that will trigger graceful shutdown
///
/// # Returns
/// Returns Ok(()) if the server shuts down gracefully, or an error if startup fails
pub async fn serve(
    listen: String,
    port: u16,
    store: Arc<StateStore>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    let version = env!("CARGO_PKG_VERSION");

    let state = Arc::new(AppState { version, store });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", listen, port).parse()?;
    tracing::info!("Starting HTTP API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("HTTP API server shutting down gracefully");
        })
        .await?;

    Ok(())
}
