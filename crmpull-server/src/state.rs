use crmpull_client::CompanyFetcher;
use crmpull_client::FetchError;
use crmpull_core::Settings;
use crmpull_core::fetch::build_fetcher;
use std::sync::Arc;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub fetcher: CompanyFetcher,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let fetcher = build_fetcher(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            fetcher,
        })
    }

    /// Body webhook if non-empty, else the configured default.
    pub fn resolve_webhook(&self, requested: Option<&str>) -> Option<String> {
        requested
            .map(str::trim)
            .filter(|hook| !hook.is_empty())
            .map(str::to_string)
            .or_else(|| self.settings.webhook.clone())
    }

    /// Requested limit capped at `max_companies`.
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        let max = self.settings.max_companies;
        requested.map_or(max, |limit| limit.min(max))
    }
}
