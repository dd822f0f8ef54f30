use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use canonical::{normalize, CanonicalName};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CatalogError;
use crate::product::Product;

/// One product plus its names prepared for matching.
///
/// Names are normalized once, when the snapshot is built, so queries only
/// pay for preparing their own side.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: Arc<Product>,
    pub disease: CanonicalName,
    pub plant: CanonicalName,
    pub disease_common: CanonicalName,
}

impl CatalogEntry {
    fn new(product: Product) -> Self {
        let disease = CanonicalName::from_opt(product.disease_scientific_name.as_deref());
        let plant = CanonicalName::from_opt(product.plant_scientific_name.as_deref());
        let disease_common = CanonicalName::from_opt(product.disease_common_name.as_deref());
        Self {
            product: Arc::new(product),
            disease,
            plant,
            disease_common,
        }
    }
}

/// Summary counts over a snapshot, keyed on normalized names.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_products: usize,
    pub unique_diseases: usize,
    pub unique_plants: usize,
}

/// An immutable, versioned copy of the catalog.
///
/// Entries keep the order of the batch they were published from; that order
/// is the tie-breaker the ranker falls back on.
#[derive(Debug)]
pub struct CatalogSnapshot {
    generation: u64,
    published_at: Option<DateTime<Utc>>,
    entries: Vec<CatalogEntry>,
    by_id: HashMap<u64, usize>,
}

impl CatalogSnapshot {
    /// The generation-0 snapshot every cache starts with.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            published_at: None,
            entries: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Builds a snapshot off to the side. The generation is assigned by the
    /// cache at swap time.
    pub(crate) fn build(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut entries = Vec::with_capacity(products.len());

        for product in products {
            if by_id.insert(product.id, entries.len()).is_some() {
                return Err(CatalogError::DuplicateProductId(product.id));
            }
            entries.push(CatalogEntry::new(product));
        }

        Ok(Self {
            generation: 0,
            published_at: None,
            entries,
            by_id,
        })
    }

    pub(crate) fn stamp(mut self, generation: u64) -> Self {
        self.generation = generation;
        self.published_at = Some(Utc::now());
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn products(&self) -> impl Iterator<Item = &Arc<Product>> + '_ {
        self.entries.iter().map(|e| &e.product)
    }

    pub fn get(&self, id: u64) -> Option<&Arc<Product>> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx].product)
    }

    pub fn stats(&self) -> CatalogStats {
        let unique_diseases: HashSet<&str> = self
            .entries
            .iter()
            .filter(|e| !e.disease.is_empty())
            .map(|e| e.disease.as_str())
            .collect();
        let unique_plants: HashSet<&str> = self
            .entries
            .iter()
            .filter(|e| !e.plant.is_empty())
            .map(|e| e.plant.as_str())
            .collect();

        CatalogStats {
            total_products: self.entries.len(),
            unique_diseases: unique_diseases.len(),
            unique_plants: unique_plants.len(),
        }
    }

    /// Products whose normalized disease and plant names both equal the
    /// normalized query names.
    pub fn find_exact(&self, disease: &str, plant: &str) -> Vec<Arc<Product>> {
        let disease = normalize(disease);
        let plant = normalize(plant);
        if disease.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|e| e.disease.as_str() == disease && e.plant.as_str() == plant)
            .map(|e| Arc::clone(&e.product))
            .collect()
    }

    /// Products whose normalized common disease name contains the normalized
    /// query as a substring.
    pub fn find_by_disease(&self, common_name: &str) -> Vec<Arc<Product>> {
        let needle = normalize(common_name);
        if needle.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|e| e.disease_common.as_str().contains(needle.as_str()))
            .map(|e| Arc::clone(&e.product))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CatalogSnapshot {
        CatalogSnapshot::build(vec![
            Product::new(1)
                .with_plant("Rosa")
                .with_disease("Diplocarpon rosae")
                .with_disease_common_name("Black spot"),
            Product::new(2)
                .with_plant("rosa")
                .with_disease("Puccinia")
                .with_disease_common_name("Rose rust"),
            Product::new(3)
                .with_plant("Vitis vinifera")
                .with_disease("DIPLOCARPON  rosae")
                .with_disease_common_name("Black spot of grape"),
        ])
        .expect("build snapshot")
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = CatalogSnapshot::build(vec![Product::new(4), Product::new(4)])
            .expect_err("duplicate ids");
        assert!(matches!(err, CatalogError::DuplicateProductId(4)));
    }

    #[test]
    fn keeps_insertion_order_and_prepares_names() {
        let snapshot = sample();
        let ids: Vec<u64> = snapshot.products().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(snapshot.entries()[2].disease.as_str(), "diplocarpon rosae");
        assert_eq!(snapshot.get(2).map(|p| p.id), Some(2));
        assert!(snapshot.get(99).is_none());
    }

    #[test]
    fn stats_count_normalized_names() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            CatalogStats {
                total_products: 3,
                unique_diseases: 2,
                unique_plants: 2,
            }
        );
    }

    #[test]
    fn exact_lookup_ignores_formatting() {
        let snapshot = sample();
        let hits = snapshot.find_exact(" diplocarpon ROSAE", "ROSA");
        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert!(snapshot.find_exact("", "Rosa").is_empty());
    }

    #[test]
    fn common_name_lookup_is_substring() {
        let snapshot = sample();
        let hits = snapshot.find_by_disease("black SPOT");
        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(snapshot.find_by_disease("  ").is_empty());
    }

    #[test]
    fn empty_snapshot_is_generation_zero() {
        let snapshot = CatalogSnapshot::empty();
        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.is_empty());
        assert!(snapshot.published_at().is_none());
        assert_eq!(snapshot.stats(), CatalogStats::default());
    }
}
