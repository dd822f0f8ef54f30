//! End-to-end matching scenarios through the umbrella crate.

use std::sync::Arc;

use phytomatch::{
    CatalogCache, MatchConfig, MatchError, Matcher, PreparedQuery, Product, ProductQuery, Tier,
    match_products, rank,
};
use proptest::prelude::*;

fn rose_catalog() -> Vec<Product> {
    vec![
        Product::new(1)
            .with_disease("Diplocarpon rosae")
            .with_plant("Rosa")
            .with_product_name("RoseGuard"),
        Product::new(2)
            .with_disease("Puccinia")
            .with_plant("Rosa")
            .with_product_name("RustAway"),
    ]
}

#[test]
fn exact_disease_and_plant_is_single_exact_hit() {
    let products = vec![Product::new(1).with_disease("Diplocarpon rosae").with_plant("Rosa")];
    let query = ProductQuery::new("Diplocarpon rosae").with_plant("Rosa");

    let matches = match_products(products, &query).expect("exact match");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].tier, Tier::Exact);
    assert_eq!(matches[0].score, 100.0);
}

#[test]
fn typo_in_disease_still_ranks_intended_product_first() {
    let query = ProductQuery::new("diplocarpon rosa").with_plant("rosa");
    let matches = match_products(rose_catalog(), &query).expect("fuzzy match");

    assert_eq!(matches[0].product.id, 1);
    assert!(matches[0].score >= 60.0, "score was {}", matches[0].score);
    if let Some(other) = matches.iter().find(|m| m.product.id == 2) {
        assert!(other.score < matches[0].score);
    }
}

#[test]
fn empty_catalog_is_an_error_not_an_empty_list() {
    let matcher = Matcher::new(Arc::new(CatalogCache::new()), MatchConfig::default()).unwrap();
    for query in [
        ProductQuery::new("Diplocarpon rosae"),
        ProductQuery::new("Puccinia").with_plant("Rosa"),
        ProductQuery::new(""),
    ] {
        assert_eq!(matcher.search(&query).unwrap_err(), MatchError::EmptyCatalog);
    }
}

#[test]
fn result_length_never_exceeds_limit() {
    let products: Vec<Product> = (0..20)
        .map(|id| Product::new(id).with_disease("Puccinia").with_plant("Rosa"))
        .collect();
    let config = MatchConfig::default().with_max_results(3);
    let cache = CatalogCache::with_products(products).unwrap();
    let matcher = Matcher::new(Arc::new(cache), config).unwrap();

    let matches = matcher
        .search(&ProductQuery::new("Puccinia").with_plant("Rosa"))
        .unwrap();
    assert_eq!(matches.len(), 3);
    let ids: Vec<u64> = matches.iter().map(|m| m.product.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn plant_is_optional() {
    let matches = match_products(rose_catalog(), &ProductQuery::new("Puccinia")).unwrap();
    assert_eq!(matches[0].product.id, 2);
    assert_eq!(matches[0].tier, Tier::Exact);
    assert_eq!(matches[0].plant_score, None);
}

#[test]
fn casing_and_spacing_do_not_change_the_answer() {
    let tidy = match_products(
        rose_catalog(),
        &ProductQuery::new("Diplocarpon rosae").with_plant("Rosa"),
    )
    .unwrap();
    let messy = match_products(
        rose_catalog(),
        &ProductQuery::new("  DIPLOCARPON   Rosae ").with_plant("rosa"),
    )
    .unwrap();
    assert_eq!(tidy, messy);
}

proptest! {
    #[test]
    fn search_returns_min_of_candidates_and_limit(size in 1u64..30, limit in 1usize..10) {
        let products: Vec<Product> = (0..size)
            .map(|id| Product::new(id).with_disease("Puccinia graminis").with_plant("Triticum"))
            .collect();
        let cache = CatalogCache::with_products(products).unwrap();
        let matcher = Matcher::new(
            Arc::new(cache),
            MatchConfig::default().with_max_results(limit),
        )
        .unwrap();

        let matches = matcher.search(&ProductQuery::new("puccinia graminis")).unwrap();
        prop_assert_eq!(matches.len(), (size as usize).min(limit));
    }

    #[test]
    fn raising_fuzzy_cutoff_never_adds_results(
        low in 0.0f64..70.0,
        delta in 0.0f64..15.0,
        epithet in "[a-z]{3,10}",
        plant in prop::option::of("[a-z]{3,8}"),
    ) {
        let cache = CatalogCache::with_products(rose_catalog()).unwrap();
        let snapshot = cache.current();
        let mut query = ProductQuery::new(format!("diplocarpon {epithet}"));
        if let Some(plant) = plant {
            query = query.with_plant(plant);
        }
        let prepared = PreparedQuery::new(&query);

        let loose = MatchConfig::default().with_max_results(100).with_cutoffs(85.0, low);
        let strict = loose.clone().with_cutoffs(85.0, low + delta);

        let loose_ids: Vec<u64> = rank(&snapshot, &prepared, &loose)
            .iter()
            .map(|m| m.product.id)
            .collect();
        for m in rank(&snapshot, &prepared, &strict) {
            prop_assert!(loose_ids.contains(&m.product.id));
        }
    }
}
