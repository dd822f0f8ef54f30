use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or publishing a catalog snapshot.
///
/// Any of these leaves the previously published snapshot in place.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id {0} in catalog batch")]
    DuplicateProductId(u64),
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Raised by producers handed to `CatalogCache::publish_with` (an
    /// import job, a remote fetch) when they cannot assemble a batch. The
    /// catalog itself never builds this variant.
    #[error("catalog build failed: {0}")]
    Build(String),
}
