use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[source] reqwest::Error),

    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("Upstream request failed with status code {status}")]
    Upstream { status: u16, body: Option<Value> },
}

impl FetchError {
    /// Error body returned by the upstream, if it sent a JSON one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            FetchError::Upstream { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

// The webhook URL carries the access token; reqwest errors echo the URL.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::HttpError(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
