use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use crmpull_client::Record;
use serde::{Deserialize, Serialize};
use tracing::info;

// --- POST /api/fetch-companies ---

#[derive(Debug, Default, Deserialize)]
pub struct FetchCompaniesRequest {
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FetchCompaniesResponse {
    pub success: bool,
    pub count: usize,
    pub companies: Vec<Record>,
}

/// Only `application/json` bodies are parsed; any other content type, or an
/// empty body, counts as `{}`.
pub fn parse_fetch_request(content_type: Option<&str>, body: &[u8]) -> Result<FetchCompaniesRequest, ApiError> {
    if !content_type.is_some_and(is_json) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FetchCompaniesRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
}

pub async fn fetch_companies(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FetchCompaniesResponse>, ApiError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let request = parse_fetch_request(content_type, &body)?;

    let webhook = state
        .resolve_webhook(request.webhook.as_deref())
        .ok_or(ApiError::MissingWebhook)?;
    let limit = state.resolve_limit(request.limit);

    info!("Fetching companies from the CRM (limit {})", limit);
    let companies = state.fetcher.fetch(&webhook, limit).await?;
    info!("Fetched {} companies", companies.len());

    Ok(Json(FetchCompaniesResponse {
        success: true,
        count: companies.len(),
        companies,
    }))
}

// --- GET /api/status ---

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub webhook_configured: bool,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "Server is running",
        webhook_configured: state.settings.webhook_configured(),
    })
}
