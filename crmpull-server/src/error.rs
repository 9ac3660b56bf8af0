use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crmpull_client::FetchError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub const MISSING_WEBHOOK_MESSAGE: &str = "Webhook is not set. Pass \"webhook\" in the request body \
     or set the BITRIX24_WEBHOOK environment variable";
pub const UNKNOWN_ERROR_DETAILS: &str = "Unknown error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", MISSING_WEBHOOK_MESSAGE)]
    MissingWebhook,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            ApiError::MissingWebhook | ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            ApiError::Fetch(FetchError::InvalidUrl(_)) => (StatusCode::BAD_REQUEST, None),
            ApiError::Fetch(err) => {
                error!("Fetching companies failed: {}", err);
                if let Some(body) = err.details() {
                    error!("Upstream error details: {}", body);
                }
                let details = err
                    .details()
                    .cloned()
                    .unwrap_or_else(|| Value::String(UNKNOWN_ERROR_DETAILS.to_string()));
                (StatusCode::INTERNAL_SERVER_ERROR, Some(details))
            }
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
