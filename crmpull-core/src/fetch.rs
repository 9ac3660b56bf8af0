use crate::config::Settings;
use crmpull_client::{CompanyFetcher, FetchError, FetchRequest, PageProgress, Record};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Options for a single fetch run
pub struct FetchOptions {
    pub request: FetchRequest,
    pub show_progress: bool,
}

/// Callback for reporting fetch progress
pub type FetchProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Build a fetcher configured from settings
pub fn build_fetcher(settings: &Settings) -> Result<CompanyFetcher, FetchError> {
    Ok(CompanyFetcher::with_timeout(settings.request_timeout_secs)?
        .with_page_size(settings.page_size)
        .with_request_delay(settings.request_delay))
}

pub fn describe_progress(progress: &PageProgress) -> String {
    format!(
        "Page {}: +{} companies ({} total)",
        progress.page, progress.received, progress.accumulated
    )
}

/// Execute a fetch with the given options
/// Returns the fetched records
pub async fn execute_fetch(
    fetcher: &CompanyFetcher,
    options: FetchOptions,
    progress_callback: Option<FetchProgressCallback>,
) -> Result<Vec<Record>, FetchError> {
    let FetchOptions {
        request,
        show_progress,
    } = options;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Requesting first page...");
        Some(pb)
    } else {
        None
    };

    let spinner_clone = spinner.clone();
    let fetcher = fetcher.clone().with_page_callback(Arc::new(move |progress| {
        let message = describe_progress(&progress);
        if let Some(ref pb) = spinner_clone {
            pb.set_message(message.clone());
        }
        if let Some(ref callback) = progress_callback {
            callback(message);
        }
    }));

    let result = fetcher.fetch(&request.endpoint, request.limit).await;

    if let Some(pb) = spinner {
        match &result {
            Ok(records) => pb.finish_with_message(format!("Fetched {} companies", records.len())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
