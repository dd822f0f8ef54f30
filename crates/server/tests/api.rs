//! HTTP surface tests, driving the router in-process with `oneshot`.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use catalog::{CatalogCache, Product};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

fn products() -> Vec<Product> {
    vec![
        Product::new(1)
            .with_disease("Diplocarpon rosae")
            .with_plant("Rosa")
            .with_disease_common_name("Black spot")
            .with_product_name("RoseGuard")
            .with_usage("Spray every 7 days"),
        Product::new(2)
            .with_disease("Puccinia")
            .with_plant("Rosa")
            .with_disease_common_name("Rose rust")
            .with_product_name("RustAway"),
    ]
}

fn config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.api_keys.insert(ADMIN_KEY.to_string());
    config
}

fn app_with(config: ServerConfig, catalog: CatalogCache) -> (Router, Arc<ServerState>) {
    let state = Arc::new(
        ServerState::with_catalog(config, Arc::new(catalog)).expect("server state"),
    );
    (build_router(state.clone()), state)
}

fn app() -> Router {
    app_with(config(), CatalogCache::with_products(products()).expect("catalog")).0
}

fn empty_app() -> Router {
    app_with(config(), CatalogCache::new()).0
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_catalog_stats() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["generation"], 1);
    assert_eq!(body["catalog"]["stats"]["total_products"], 2);
    assert_eq!(body["catalog"]["stats"]["unique_plants"], 1);
}

#[tokio::test]
async fn ready_is_unavailable_until_catalog_published() {
    let (status, body) = send(empty_app(), get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");

    let (status, _) = send(app(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_matches() {
    let (status, body) = send(
        app(),
        get("/api/v1/products/search?disease_scientific_name=Diplocarpon%20rosae&plant_scientific_name=Rosa"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_matches"], 1);
    let hit = &body["matches"][0];
    assert_eq!(hit["rank"], 1);
    assert_eq!(hit["product_id"], 1);
    assert_eq!(hit["product_name"], "RoseGuard");
    assert_eq!(hit["usage_instructions"], "Spray every 7 days");
    assert_eq!(hit["tier"], "EXACT");
    assert_eq!(hit["match_score"], 100.0);
}

#[tokio::test]
async fn typo_query_still_finds_product() {
    let (status, body) = send(
        app(),
        get("/api/v1/products/search?disease_scientific_name=diplocarpon%20rosa&plant_scientific_name=rosa"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"][0]["product_id"], 1);
    assert!(body["matches"][0]["match_score"].as_f64().unwrap() >= 60.0);
}

#[tokio::test]
async fn empty_catalog_is_service_unavailable() {
    let (status, body) = send(
        empty_app(),
        get("/api/v1/products/search?disease_scientific_name=Puccinia"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "CATALOG_EMPTY");

    let (status, _) = send(empty_app(), get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn no_match_is_not_found_and_blank_query_is_bad_request() {
    let (status, body) = send(
        app(),
        get("/api/v1/products/search?disease_scientific_name=Xanthomonas%20campestris&plant_scientific_name=Brassica"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NO_MATCH");

    let (status, body) = send(app(), get("/api/v1/products/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn detection_body_accepts_lists() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/v1/products/match",
            json!({
                "disease_scientific_name": ["", "Puccinia"],
                "plant_scientific_name": "Rosa"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"]["disease_scientific_name"], "Puccinia");
    assert_eq!(body["matches"][0]["product_id"], 2);
}

#[tokio::test]
async fn lookups_find_products_or_404() {
    let (status, body) = send(
        app(),
        get("/api/v1/products/by-scientific-name/diplocarpon%20ROSAE?scientific_name=rosa"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], 1);

    let (status, body) = send(app(), get("/api/v1/products/by-disease/rust")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["product_name"], "RustAway");

    let (status, body) = send(app(), get("/api/v1/products/by-disease/mildew")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_products_keeps_catalog_order() {
    let (status, body) = send(app(), get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn reload_requires_admin_key() {
    let (status, body) = send(app(), post_json("/api/v1/catalog/reload", json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/catalog/reload")
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reload_publishes_file_and_failure_keeps_snapshot() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": 9, "disease_scientific_name": "Erysiphe necator", "scientific_name": "Vitis vinifera"}}]"#
    )
    .unwrap();

    let config = ServerConfig {
        catalog_path: Some(file.path().to_path_buf()),
        ..config()
    };
    let (app, state) = app_with(config, CatalogCache::with_products(products()).unwrap());

    let reload = || {
        Request::builder()
            .method("POST")
            .uri("/api/v1/catalog/reload")
            .header("authorization", format!("Bearer {ADMIN_KEY}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app.clone(), reload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 2);
    assert_eq!(body["stats"]["total_products"], 1);

    std::fs::write(file.path(), "[{\"id\": 1},").unwrap();
    let (status, body) = send(app.clone(), reload()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CATALOG_RELOAD_FAILED");
    assert_eq!(state.catalog().generation(), 2);

    let (status, body) = send(app, get("/api/v1/catalog")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generation"], 2);
}

#[tokio::test]
async fn unknown_route_uses_error_body() {
    let (status, body) = send(app(), get("/api/v1/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn malformed_detection_body_uses_error_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/products/match")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn exact_lookup_without_plant_uses_error_body() {
    let (status, body) = send(app(), get("/api/v1/products/by-scientific-name/Puccinia")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("scientific_name"));
}
