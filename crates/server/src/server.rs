//! Server initialization and routing
//!
//! - Router configuration with all API endpoints
//! - Middleware stack (request id, logging, timeout, compression, CORS)
//! - Startup catalog load and the optional periodic reload task
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{api_key_auth, log_requests, request_id};
use crate::routes::{api_info, not_found};
use crate::routes::{catalog, health, products};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Every route is public except catalog reload, which requires an admin API
/// key. Layers run outermost first: request id, logging, trace, CORS,
/// compression, timeout.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/search", get(products::search_products))
        .route("/api/v1/products/match", post(products::match_detection))
        .route(
            "/api/v1/products/by-scientific-name/{disease_scientific_name}",
            get(products::by_scientific_name),
        )
        .route(
            "/api/v1/products/by-disease/{disease_name}",
            get(products::by_disease),
        )
        .route("/api/v1/catalog", get(catalog::catalog_info));

    let admin_routes = Router::new()
        .route("/api/v1/catalog/reload", post(catalog::reload_catalog))
        .route_layer(from_fn_with_state(state.clone(), api_key_auth));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .with_state(state)
}

/// Reload the catalog every `interval` until the runtime shuts down.
///
/// A failed reload is logged and the current snapshot keeps serving.
pub fn spawn_reload_task(state: Arc<ServerState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; startup already loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.reload_catalog_async().await {
                Ok(generation) => tracing::info!(generation, "periodic catalog reload"),
                Err(err) => tracing::warn!(error = %err, "periodic catalog reload failed"),
            }
        }
    })
}

fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();
}

/// Start the phytomatch HTTP server
///
/// 1. Sets up structured JSON logging with the configured log level
/// 2. Installs the match metrics recorder
/// 3. Loads `catalog_path` when configured; a failure leaves the catalog
///    empty and `/ready` reporting 503
/// 4. Starts the periodic reload task when `reload_interval_secs > 0`
/// 5. Serves until SIGTERM or Ctrl+C
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let state = Arc::new(ServerState::new(config.clone())?);
    state.install_metrics();

    if config.catalog_path.is_some() {
        match state.reload_catalog_async().await {
            Ok(generation) => tracing::info!(generation, "initial catalog loaded"),
            Err(err) => tracing::error!(error = %err, "initial catalog load failed"),
        }
    } else {
        tracing::warn!("No catalog_path configured; serving an empty catalog");
    }

    let reload_task = config
        .reload_interval()
        .map(|interval| spawn_reload_task(state.clone(), interval));

    let app = build_router(state);
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        %addr,
        admin_keys = config.api_keys.len(),
        timeout_secs = config.timeout_secs,
        max_body_mb = config.max_body_size_mb,
        memo_capacity = config.memo_capacity,
        reload_interval_secs = config.reload_interval_secs,
        "Starting phytomatch server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = reload_task {
        task.abort();
    }
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
