//! # Phytomatch Catalog
//!
//! Holds the remediation product catalog the matcher ranks against. The
//! catalog is rebuilt from an external import from time to time; this crate
//! makes that rebuild safe for concurrent readers.
//!
//! ## Core Types
//!
//! - [`Product`]: one fixed-shape product record with optional text fields.
//! - [`CatalogSnapshot`]: an immutable, ordered collection of products plus a
//!   generation number. Product names are normalized once, at build time.
//! - [`CatalogCache`]: owns the current snapshot. [`CatalogCache::publish`]
//!   builds a new snapshot off to the side and swaps it in atomically;
//!   [`CatalogCache::current`] hands out the latest one without waiting on
//!   a build in progress.
//!
//! ## Guarantees
//!
//! - A snapshot is never mutated after it is published.
//! - Generations increase by one per successful publish, starting from the
//!   empty generation-0 snapshot.
//! - A failed publish (duplicate ids, unreadable or malformed file) leaves
//!   the previous snapshot current and returns the error to the caller.
//!
//! ## Example
//!
//! ```
//! use catalog::{CatalogCache, Product};
//!
//! let cache = CatalogCache::new();
//! let generation = cache
//!     .publish(vec![Product::new(1).with_plant("Rosa").with_disease("Diplocarpon rosae")])
//!     .unwrap();
//! assert_eq!(generation, 1);
//!
//! let snapshot = cache.current();
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot.generation(), 1);
//! ```

mod cache;
mod error;
mod loader;
mod product;
mod snapshot;

pub use crate::cache::CatalogCache;
pub use crate::error::CatalogError;
pub use crate::loader::load_products;
pub use crate::product::Product;
pub use crate::snapshot::{CatalogEntry, CatalogSnapshot, CatalogStats};
