use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Liveness probe. Always 200 while the process serves requests.
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let snapshot = state.catalog().current();

    Json(json!({
        "status": "healthy",
        "service": "phytomatch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "catalog": {
            "generation": snapshot.generation(),
            "stats": snapshot.stats(),
        }
    }))
}

/// Readiness probe. 503 until a non-empty catalog has been published.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let snapshot = state.catalog().current();
    let ready = !snapshot.is_empty();
    let (status, label, catalog) = if ready {
        (StatusCode::OK, "ready", "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready", "empty")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "phytomatch-server",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": uptime_seconds(),
            "components": {
                "api": "ready",
                "catalog": catalog,
            }
        })),
    )
}

/// Match counters as JSON.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "uptime_seconds": uptime_seconds(),
        "catalog_generation": state.catalog().generation(),
        "matcher": state.metrics.snapshot(),
        "memo_entries": state.matcher.memo().map(|memo| memo.len()).unwrap_or(0),
    }))
}
