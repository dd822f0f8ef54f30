//! Workspace umbrella crate for phytomatch.
//!
//! This crate stitches together name canonicalization, the versioned product
//! catalog and the tiered matcher so callers can go from a YAML config file
//! to ranked remediation products with a single API entry point.

pub mod config;

pub use canonical::{CanonicalName, Token, normalize, tokenize};
pub use catalog::{
    CatalogCache, CatalogEntry, CatalogError, CatalogSnapshot, CatalogStats, Product,
    load_products,
};
pub use config::{CatalogSection, ConfigLoadError, MemoSection, PhytomatchConfig};
pub use matcher::{
    MatchConfig, MatchError, MatchMetrics, MatchOutcome, Matcher, PreparedQuery, ProductMatch,
    ProductQuery, Tier, rank, score, set_match_metrics,
};

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Errors that can occur while assembling a matcher from configuration.
#[derive(Debug)]
pub enum PhytomatchError {
    Config(ConfigLoadError),
    Catalog(CatalogError),
    Match(MatchError),
}

impl fmt::Display for PhytomatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhytomatchError::Config(err) => write!(f, "configuration failure: {err}"),
            PhytomatchError::Catalog(err) => write!(f, "catalog failure: {err}"),
            PhytomatchError::Match(err) => write!(f, "matcher failure: {err}"),
        }
    }
}

impl Error for PhytomatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PhytomatchError::Config(err) => Some(err),
            PhytomatchError::Catalog(err) => Some(err),
            PhytomatchError::Match(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for PhytomatchError {
    fn from(value: ConfigLoadError) -> Self {
        PhytomatchError::Config(value)
    }
}

impl From<CatalogError> for PhytomatchError {
    fn from(value: CatalogError) -> Self {
        PhytomatchError::Catalog(value)
    }
}

impl From<MatchError> for PhytomatchError {
    fn from(value: MatchError) -> Self {
        PhytomatchError::Match(value)
    }
}

/// Build a [`Matcher`] from a parsed configuration.
///
/// When `catalog.path` is set the file is loaded and published as
/// generation 1; otherwise the matcher starts on an empty catalog that can be
/// filled through [`Matcher::catalog`].
pub fn build_matcher(config: &PhytomatchConfig) -> Result<Matcher, PhytomatchError> {
    config.validate()?;

    let cache = Arc::new(CatalogCache::new());
    if let Some(path) = &config.catalog.path {
        let generation = cache.reload_from_path(path)?;
        tracing::info!(
            path = %path.display(),
            generation,
            products = cache.current().len(),
            "catalog loaded"
        );
    }

    let matcher = Matcher::new(cache, config.matcher.clone())?.with_memo(config.memo_capacity());
    Ok(matcher)
}

/// Read a YAML config file and build the matcher it describes.
pub fn build_matcher_from_file(path: impl AsRef<Path>) -> Result<Matcher, PhytomatchError> {
    let config = PhytomatchConfig::from_file(path)?;
    build_matcher(&config)
}

/// Search with a throwaway matcher over `products` using the default policy.
///
/// Convenient for one-off lookups and tests; long-lived callers should keep
/// a [`Matcher`] so the catalog is indexed once.
pub fn match_products(
    products: Vec<Product>,
    query: &ProductQuery,
) -> Result<Vec<ProductMatch>, PhytomatchError> {
    let cache = CatalogCache::with_products(products)?;
    let matcher = Matcher::new(Arc::new(cache), MatchConfig::default())?;
    Ok(matcher.search(query)?)
}
