//! Reads the catalog file published by the import job.
//!
//! The file is a JSON array of product records. Parsing is strict: one bad
//! record fails the whole load, so a truncated export can never be published.

use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::product::Product;

pub fn load_products(path: impl AsRef<Path>) -> Result<Vec<Product>, CatalogError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let products: Vec<Product> =
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), products = products.len(), "catalog file loaded");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CatalogCache;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file
    }

    #[test]
    fn loads_records_in_file_order() {
        let file = write_catalog(
            r#"[
                {"id": 2, "scientific_name": "Rosa", "disease_scientific_name": "Diplocarpon rosae"},
                {"id": 1, "plant_scientific_name": "Vitis", "disease_scientific_name": "Erysiphe necator"}
            ]"#,
        );
        let products = load_products(file.path()).expect("load");
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(products[1].plant_scientific_name.as_deref(), Some("Vitis"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_products(dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_record_fails_whole_load() {
        let file = write_catalog(r#"[{"id": 1}, {"id": "two"}]"#);
        let err = load_products(file.path()).expect_err("bad record");
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn failed_reload_keeps_current_snapshot() {
        let good = write_catalog(r#"[{"id": 1, "disease_scientific_name": "Puccinia"}]"#);
        let bad = write_catalog("[{\"id\": 1},");

        let cache = CatalogCache::new();
        assert_eq!(cache.reload_from_path(good.path()).expect("reload"), 1);
        assert!(cache.reload_from_path(bad.path()).is_err());

        let snapshot = cache.current();
        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.len(), 1);
    }
}
