//! Health and Infrastructure Handlers
//!
//! Kubernetes probes and Prometheus metrics.

use axum::{extract::State, http::StatusCode, response::Json};
use prometheus::Encoder;

use super::router::AppState;
use crate::metrics;

/// Health response for main health endpoint
#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub documents: usize,
    pub active_sessions: usize,
    pub snapshot_pending: bool,
}

/// Main health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = state.store.counts();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: counts.projects + counts.events + counts.team + counts.gallery + counts.forms,
        active_sessions: state.sessions.len(),
        snapshot_pending: state.store.is_dirty(),
    })
}

/// Liveness probe - 200 whenever the process can answer
pub async fn health_live() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Readiness probe - 503 until an admin account exists
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let admins = state.store.admin_count();
    let status = if admins > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if admins > 0 { "ready" } else { "no_admin" },
            "version": env!("CARGO_PKG_VERSION"),
            "admins": admins,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// Prometheus text exposition
pub async fn metrics_endpoint() -> Result<String, StatusCode> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = metrics::METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
