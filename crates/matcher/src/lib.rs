//! # Phytomatch Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` ranks remediation products for a detected disease, optionally
//! on a given plant. It sits on top of `canonical` (name normalization) and
//! `catalog` (versioned product snapshots) and is the only layer that can
//! fail a query.
//!
//! ## Pipeline
//!
//! normalize → tokenize → score every product → tier → sort → truncate.
//! All of it is synchronous CPU work over an immutable snapshot, so many
//! searches can run at once without coordinating.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: relative disease/plant weights, STRONG and FUZZY
//!   cutoffs, result limit K.
//! - [`ProductQuery`]: disease scientific name plus optional plant name.
//! - [`ProductMatch`]: product, combined score (0–100), [`Tier`], and the
//!   component scores it was built from.
//! - [`Matcher`]: wires a shared [`catalog::CatalogCache`] to the ranker and
//!   an optional generation-aware [`QueryMemo`].
//! - [`rank`]: the pure ranking function, usable directly on a snapshot.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use catalog::{CatalogCache, Product};
//! use matcher::{MatchConfig, Matcher, ProductQuery, Tier};
//!
//! let cache = CatalogCache::with_products(vec![
//!     Product::new(1).with_disease("Diplocarpon rosae").with_plant("Rosa"),
//!     Product::new(2).with_disease("Puccinia").with_plant("Rosa"),
//! ])
//! .unwrap();
//! let matcher = Matcher::new(Arc::new(cache), MatchConfig::default())
//!     .unwrap()
//!     .with_memo(256);
//!
//! let matches = matcher
//!     .search(&ProductQuery::new("Diplocarpon rosae").with_plant("rosa"))
//!     .unwrap();
//! assert_eq!(matches[0].product.id, 1);
//! assert_eq!(matches[0].tier, Tier::Exact);
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-search latency, outcome and memo hits. Ranking itself emits a
//! `debug` tracing event with per-tier counts.

pub mod engine;
pub mod memo;
pub mod metrics;
pub mod similarity;
pub mod types;

pub use crate::engine::{rank, Matcher};
pub use crate::memo::{MemoKey, QueryMemo};
pub use crate::metrics::{set_match_metrics, MatchMetrics, MatchOutcome};
pub use crate::similarity::{score, score_names, string_ratio, token_overlap};
pub use crate::types::{MatchConfig, MatchError, PreparedQuery, ProductMatch, ProductQuery, Tier};
