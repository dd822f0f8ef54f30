use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::error::CatalogError;
use crate::loader::load_products;
use crate::product::Product;
use crate::snapshot::CatalogSnapshot;

/// Holder of the current catalog snapshot.
///
/// Readers clone an `Arc` to the current snapshot and keep working on it for
/// as long as they like. A publish builds the replacement completely before
/// taking the write lock, and holds that lock only for the pointer swap, so
/// readers never wait on a build and never observe a half-built catalog.
#[derive(Debug)]
pub struct CatalogCache {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    /// A cache holding the empty generation-0 snapshot.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
        }
    }

    /// A cache with `products` already published as generation 1.
    pub fn with_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let cache = Self::new();
        cache.publish(products)?;
        Ok(cache)
    }

    /// The latest published snapshot.
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    pub fn generation(&self) -> u64 {
        self.current().generation()
    }

    /// Atomically replaces the current snapshot with one built from
    /// `products` and returns the new generation number.
    ///
    /// All-or-nothing: on error the previous snapshot stays current.
    pub fn publish(&self, products: Vec<Product>) -> Result<u64, CatalogError> {
        let started = Instant::now();
        let count = products.len();

        let snapshot = match CatalogSnapshot::build(products) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "catalog publish rejected; keeping previous snapshot");
                return Err(err);
            }
        };

        let generation = self.swap(snapshot);
        if count == 0 {
            tracing::warn!(generation, "published an empty catalog");
        }
        tracing::info!(
            generation,
            products = count,
            duration_ms = %started.elapsed().as_millis(),
            "catalog snapshot published"
        );
        Ok(generation)
    }

    /// Runs a fallible producer and publishes its output. A producer error
    /// is returned unchanged and nothing is published.
    pub fn publish_with<F>(&self, produce: F) -> Result<u64, CatalogError>
    where
        F: FnOnce() -> Result<Vec<Product>, CatalogError>,
    {
        match produce() {
            Ok(products) => self.publish(products),
            Err(err) => {
                tracing::warn!(error = %err, "catalog import failed; keeping previous snapshot");
                Err(err)
            }
        }
    }

    /// Reads a JSON catalog file and publishes it.
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> Result<u64, CatalogError> {
        let path = path.as_ref();
        self.publish_with(|| load_products(path))
    }

    fn swap(&self, snapshot: CatalogSnapshot) -> u64 {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let generation = guard.generation() + 1;
        *guard = Arc::new(snapshot.stamp(generation));
        generation
    }
}
