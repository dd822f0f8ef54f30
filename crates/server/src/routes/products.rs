use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use catalog::{CatalogSnapshot, Product};
use matcher::{MatchError, ProductMatch, ProductQuery, Tier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string of `GET /api/v1/products/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub disease_scientific_name: Option<String>,
    #[serde(default)]
    pub plant_scientific_name: Option<String>,
}

/// A detected name as produced by the vision model: one string, or a list
/// when several candidates were detected.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DetectedNames {
    One(String),
    Many(Vec<String>),
}

impl DetectedNames {
    /// The first entry with non-blank text.
    pub fn first_non_empty(&self) -> Option<&str> {
        let candidate = match self {
            DetectedNames::One(name) => Some(name.as_str()),
            DetectedNames::Many(names) => names.iter().map(String::as_str).find(|n| !n.trim().is_empty()),
        };
        candidate.filter(|name| !name.trim().is_empty())
    }
}

/// Body of `POST /api/v1/products/match`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DetectionQuery {
    #[serde(default)]
    pub disease_scientific_name: Option<DetectedNames>,
    #[serde(default)]
    pub plant_scientific_name: Option<DetectedNames>,
}

impl DetectionQuery {
    /// Picks the first usable candidate of each field.
    pub fn to_product_query(&self) -> ProductQuery {
        let disease = self
            .disease_scientific_name
            .as_ref()
            .and_then(DetectedNames::first_non_empty)
            .unwrap_or_default();
        let plant = self
            .plant_scientific_name
            .as_ref()
            .and_then(DetectedNames::first_non_empty);

        ProductQuery {
            disease_scientific_name: disease.to_string(),
            plant_scientific_name: plant.map(str::to_string),
        }
    }
}

/// Single ranked product
#[derive(Debug, Serialize)]
pub struct MatchHit {
    pub rank: usize,
    pub product_id: u64,
    pub product_name: Option<String>,
    pub product_link: Option<String>,
    pub usage_instructions: Option<String>,
    pub image: Option<String>,
    pub disease_scientific_name: Option<String>,
    pub plant_scientific_name: Option<String>,
    pub match_score: f64,
    pub tier: Tier,
    pub disease_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_score: Option<f64>,
}

impl MatchHit {
    fn new(rank: usize, m: ProductMatch) -> Self {
        let product = &m.product;
        Self {
            rank,
            product_id: product.id,
            product_name: product.product_name.clone(),
            product_link: product.product_link.clone(),
            usage_instructions: product.usage_instructions.clone(),
            image: product.image.clone(),
            disease_scientific_name: product.disease_scientific_name.clone(),
            plant_scientific_name: product.plant_scientific_name.clone(),
            match_score: round2(m.score),
            tier: m.tier,
            disease_score: round2(m.disease_score),
            plant_score: m.plant_score.map(round2),
        }
    }
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Match response
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub query: ProductQuery,
    pub total_matches: usize,
    pub matches: Vec<MatchHit>,
}

fn run_match(state: &ServerState, query: ProductQuery) -> ServerResult<MatchResponse> {
    let matches = state.matcher.search(&query)?;
    let hits: Vec<MatchHit> = matches
        .into_iter()
        .enumerate()
        .map(|(idx, m)| MatchHit::new(idx + 1, m))
        .collect();

    Ok(MatchResponse {
        query,
        total_matches: hits.len(),
        matches: hits,
    })
}

fn published_snapshot(state: &ServerState) -> ServerResult<Arc<CatalogSnapshot>> {
    let snapshot = state.catalog().current();
    if snapshot.is_empty() {
        return Err(MatchError::EmptyCatalog.into());
    }
    Ok(snapshot)
}

/// `GET /api/v1/products`: every product of the current snapshot.
pub async fn list_products(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<Arc<Product>>>> {
    let snapshot = published_snapshot(&state)?;
    Ok(Json(snapshot.products().cloned().collect()))
}

/// `GET /api/v1/products/search`: ranked matches for a disease/plant pair.
pub async fn search_products(
    State(state): State<Arc<ServerState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ServerResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = ProductQuery {
        disease_scientific_name: params.disease_scientific_name.unwrap_or_default(),
        plant_scientific_name: params.plant_scientific_name,
    };
    Ok(Json(run_match(&state, query)?))
}

/// `POST /api/v1/products/match`: ranked matches for a detection result.
pub async fn match_detection(
    State(state): State<Arc<ServerState>>,
    detection: Result<Json<DetectionQuery>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(detection) = detection?;
    let query = detection.to_product_query();
    tracing::debug!(
        disease = %query.disease_scientific_name,
        plant = query.plant_scientific_name.as_deref(),
        "matching detection result"
    );
    Ok(Json(run_match(&state, query)?))
}

/// Query string of the exact lookup.
#[derive(Debug, Deserialize)]
pub struct ExactParams {
    /// Plant scientific name.
    pub scientific_name: String,
}

/// `GET /api/v1/products/by-scientific-name/{disease}?scientific_name=`:
/// products whose normalized disease and plant names equal the request's.
pub async fn by_scientific_name(
    State(state): State<Arc<ServerState>>,
    disease: Result<Path<String>, PathRejection>,
    params: Result<Query<ExactParams>, QueryRejection>,
) -> ServerResult<Json<Vec<Arc<Product>>>> {
    let Path(disease) = disease?;
    let Query(params) = params?;
    let snapshot = published_snapshot(&state)?;
    let products = snapshot.find_exact(&disease, &params.scientific_name);
    if products.is_empty() {
        return Err(ServerError::NotFound(
            "No products found for this plant and scientific name".to_string(),
        ));
    }
    Ok(Json(products))
}

/// `GET /api/v1/products/by-disease/{name}`: substring lookup on the common
/// disease name.
pub async fn by_disease(
    State(state): State<Arc<ServerState>>,
    name: Result<Path<String>, PathRejection>,
) -> ServerResult<Json<Vec<Arc<Product>>>> {
    let Path(name) = name?;
    let snapshot = published_snapshot(&state)?;
    let products = snapshot.find_by_disease(&name);
    if products.is_empty() {
        return Err(ServerError::NotFound(
            "No products found for this disease".to_string(),
        ));
    }
    Ok(Json(products))
}
