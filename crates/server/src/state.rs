use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::metrics::ServerMetrics;
use catalog::CatalogCache;
use matcher::{MatchMetrics, Matcher};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matcher over the shared catalog cache
    pub matcher: Arc<Matcher>,

    /// Match counters served at `/metrics`
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    /// Create state around an empty catalog.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        Self::with_catalog(config, Arc::new(CatalogCache::new()))
    }

    /// Create state around an existing catalog cache.
    pub fn with_catalog(config: ServerConfig, catalog: Arc<CatalogCache>) -> ServerResult<Self> {
        let matcher =
            Matcher::new(catalog, config.matcher.clone())?.with_memo(config.memo_capacity);

        Ok(Self {
            config: Arc::new(config),
            matcher: Arc::new(matcher),
            metrics: Arc::new(ServerMetrics::default()),
        })
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        self.matcher.catalog()
    }

    /// Installs this state's counters as the process-wide match recorder.
    pub fn install_metrics(&self) {
        let recorder: Arc<dyn MatchMetrics> = self.metrics.clone();
        matcher::set_match_metrics(Some(recorder));
    }

    /// Check if API key is valid
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.config.api_keys.contains(key)
    }

    /// Reload the catalog from `catalog_path` and return the new generation.
    ///
    /// Blocks on file I/O; async callers go through `spawn_blocking`.
    pub fn reload_catalog(&self) -> ServerResult<u64> {
        let path = self
            .config
            .catalog_path
            .as_ref()
            .ok_or_else(|| ServerError::Config("catalog_path is not configured".into()))?;
        Ok(self.catalog().reload_from_path(path)?)
    }

    /// [`Self::reload_catalog`] on the blocking thread pool.
    pub async fn reload_catalog_async(&self) -> ServerResult<u64> {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.reload_catalog()).await?
    }
}
