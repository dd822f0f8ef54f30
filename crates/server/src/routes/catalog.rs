use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// `GET /api/v1/catalog`: current generation, publish time and counts.
pub async fn catalog_info(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let snapshot = state.catalog().current();

    Json(json!({
        "generation": snapshot.generation(),
        "published_at": snapshot.published_at(),
        "stats": snapshot.stats(),
        "source": state.config.catalog_path,
    }))
}

/// `POST /api/v1/catalog/reload` (admin): re-reads `catalog_path` and
/// publishes it. A failed reload leaves the current snapshot in place.
pub async fn reload_catalog(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let generation = state.reload_catalog_async().await?;
    let stats = state.catalog().current().stats();

    tracing::info!(generation, products = stats.total_products, "catalog reloaded on request");

    Ok(Json(json!({
        "status": "reloaded",
        "generation": generation,
        "stats": stats,
    })))
}
