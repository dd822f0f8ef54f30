use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Key presented by the caller, from `X-API-Key` or a Bearer token.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER) {
        return key.to_str().ok();
    }
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Guards the admin routes with the configured API keys.
pub async fn api_key_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(key) = presented_key(request.headers()) else {
        return Err(ServerError::Authentication(format!(
            "admin key required in '{API_KEY_HEADER}' or 'Authorization: Bearer'"
        )));
    };
    if !state.is_valid_api_key(key) {
        return Err(ServerError::Authentication("unknown admin key".to_string()));
    }
    Ok(next.run(request).await)
}

/// Request ID carried in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// The caller's `x-request-id` when present, otherwise a fresh v4 uuid.
    fn for_request(request: &Request) -> Self {
        let supplied = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());
        match supplied {
            Some(id) => Self(id.to_owned()),
            None => Self(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// Tags the request with a [`RequestId`] and echoes it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = RequestId::for_request(&request);
    let echo = HeaderValue::from_str(&id.0).ok();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if let Some(echo) = echo {
        response.headers_mut().insert(REQUEST_ID_HEADER, echo);
    }
    response
}

/// One event per request once the response is ready; 5xx at warn.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis();

    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, %elapsed_ms, %request_id, "request failed");
    } else {
        tracing::info!(%method, %path, status, %elapsed_ms, %request_id, "request served");
    }
    response
}
