//! Health and Metrics Routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: StoreHealth,
}

/// Report store reachability
#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub backend: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check handler; 503 when the store does not answer
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ping = state.store.ping().await;

    let (status, store) = match ping {
        Ok(()) => (
            StatusCode::OK,
            StoreHealth {
                backend: state.store.backend(),
                status: "ok",
                error: None,
            },
        ),
        Err(e) => {
            warn!(backend = state.store.backend(), error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                StoreHealth {
                    backend: state.store.backend(),
                    status: "unavailable",
                    error: Some(e.to_string()),
                },
            )
        }
    };

    let response = HealthResponse {
        status: if status.is_success() { "healthy" } else { "degraded" },
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store,
    };

    (status, Json(response))
}

/// Prometheus exposition; 404 when metrics are disabled
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
