//! HTTP server for the `/metrics` and `/sensor` endpoints.

use crate::metrics::SensorMetrics;
use crate::sensor::{DataBlob, SensorResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(String),
}

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    metrics: SensorMetrics,
    blob: DataBlob,
    payload_probability: f64,
}

impl AppState {
    /// Creates handler state over the shared metrics and payload.
    pub fn new(metrics: SensorMetrics, blob: DataBlob, payload_probability: f64) -> Self {
        Self {
            metrics,
            blob,
            payload_probability,
        }
    }

    /// Returns the shared metrics handle.
    pub fn metrics(&self) -> &SensorMetrics {
        &self.metrics
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/sensor", get(sensor_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server exposing the simulated sensor.
pub struct SensorServer {
    listener: TcpListener,
    state: AppState,
}

impl SensorServer {
    /// Binds the listener.
    ///
    /// Failing to bind is reported before any request is accepted, so the
    /// caller can abort startup.
    pub async fn bind(addr: SocketAddr, state: AppState) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, state })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener
            .local_addr()
            .map_err(|e| ServerError::Server(e.to_string()))
    }

    /// Serves requests until `shutdown` turns true or its sender is dropped.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        tracing::info!(addr = %addr, "Sensor server listening");

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("Sensor server stopped");
        Ok(())
    }
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.record_request();

    match state.metrics.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Handler for the /sensor endpoint.
async fn sensor_handler(State(state): State<AppState>) -> Response {
    let response =
        SensorResponse::choose(&mut rand::thread_rng(), state.payload_probability, &state.blob);

    if response.is_blob() {
        tracing::debug!(bytes = state.blob.len(), "Serving large sensor payload");
    }

    Json(response).into_response()
}
