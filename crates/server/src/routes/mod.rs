//! API route handlers
//!
//! - `health`: liveness, readiness and match counters
//! - `products`: catalog listing, ranked matching and direct lookups
//! - `catalog`: snapshot info and admin reload

pub mod catalog;
pub mod health;
pub mod products;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (`GET /`).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Phytomatch Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/products",
            "/api/v1/products/search",
            "/api/v1/products/match",
            "/api/v1/products/by-scientific-name/{disease_scientific_name}",
            "/api/v1/products/by-disease/{disease_name}",
            "/api/v1/catalog",
            "/api/v1/catalog/reload",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound("Not found".to_string())
}
