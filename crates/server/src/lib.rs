//! Phytomatch Server - HTTP REST API for remediation product matching
//!
//! Serves ranked remediation products for a detected plant disease out of a
//! versioned in-memory catalog.
//!
//! # Features
//!
//! - **Matching**: ranked EXACT / STRONG / FUZZY matches for a disease and
//!   optional plant, from query parameters or a detection-result body
//! - **Lookups**: exact scientific-name and common-disease-name lookups
//! - **Catalog**: JSON catalog loaded at startup, reloadable by an admin
//!   and optionally on a timer; failed reloads keep the current snapshot
//! - **Observability**: structured JSON logs, request ids, match counters
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe with catalog stats
//! - `GET /ready` - Readiness probe (503 while the catalog is empty)
//! - `GET /metrics` - Match counters
//! - `GET /api/v1/products` - Current catalog
//! - `GET /api/v1/products/search` - Ranked matches
//! - `POST /api/v1/products/match` - Ranked matches for a detection result
//! - `GET /api/v1/products/by-scientific-name/{disease}?scientific_name=` - Exact lookup
//! - `GET /api/v1/products/by-disease/{name}` - Common-name lookup
//! - `GET /api/v1/catalog` - Snapshot generation and stats
//!
//! ## Admin (API key required)
//!
//! - `POST /api/v1/catalog/reload` - Reload the catalog file
//!
//! # Errors
//!
//! Every error body is `{"error": {"code", "message"}}`. An empty catalog is
//! 503, no match 404, a blank query 400.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, spawn_reload_task, start_server};
pub use state::ServerState;
