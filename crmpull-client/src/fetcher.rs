use crate::error::{FetchError, Result};
use crate::record::{ListRequest, PageProgress, Record, parse_list_page};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Largest page the upstream list methods return.
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_LIMIT: usize = 10_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const COMPANY_LIST_METHOD: &str = "crm.company.list";
pub const COMPANY_FIELDS: &[&str] = &[
    "ID",
    "TITLE",
    "COMPANY_TYPE",
    "INDUSTRY",
    "EMPLOYEES",
    "REVENUE",
    "CURRENCY_ID",
    "PHONE",
    "EMAIL",
    "WEB",
    "ADDRESS",
    "DATE_CREATE",
];

pub type PageCallback = Arc<dyn Fn(PageProgress) + Send + Sync>;

/// Sequential pager over a CRM `*.list` method.
#[derive(Clone)]
pub struct CompanyFetcher {
    client: Client,
    method: String,
    select: Vec<String>,
    page_size: usize,
    request_delay: Duration,
    page_callback: Option<PageCallback>,
}

impl CompanyFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("crmpull/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            method: COMPANY_LIST_METHOD.to_string(),
            select: COMPANY_FIELDS.iter().map(|f| f.to_string()).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: DEFAULT_REQUEST_DELAY,
            page_callback: None,
        }
    }

    /// Must match the page length the upstream actually returns: a shorter
    /// page is taken as the last one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    pub fn select(&self) -> &[String] {
        &self.select
    }

    /// Fetch up to `limit` records from `webhook`, one page at a time.
    ///
    /// A malformed page ends the loop and returns what was collected so far.
    /// A transport failure or non-2xx status discards everything and fails.
    pub async fn fetch(&self, webhook: &str, limit: usize) -> Result<Vec<Record>> {
        let url = self.method_url(webhook)?;
        info!("Fetching up to {} records via {}", limit, self.method);

        let mut records: Vec<Record> = Vec::new();
        let mut start = 0;
        let mut page = 0;

        while records.len() < limit {
            page += 1;

            let Some(batch) = self.fetch_page(&url, start, page).await? else {
                break;
            };

            if batch.is_empty() {
                debug!("Page {} at start={} is empty, no more data", page, start);
                break;
            }

            let received = batch.len();
            records.extend(batch);
            start += self.page_size;

            if let Some(ref callback) = self.page_callback {
                callback(PageProgress {
                    page,
                    start,
                    received,
                    accumulated: records.len(),
                });
            }

            if received < self.page_size {
                debug!("Page {} returned {} < {} records, last page", page, received, self.page_size);
                break;
            }

            tokio::time::sleep(self.request_delay).await;
        }

        records.truncate(limit);
        info!("Fetched {} records in {} request(s)", records.len(), page);
        Ok(records)
    }

    /// `Ok(None)` means the upstream answered 2xx with an unusable body.
    async fn fetch_page(&self, url: &Url, start: usize, page: usize) -> Result<Option<Vec<Record>>> {
        debug!("Requesting page {} (start={})", page, start);

        let response = self
            .client
            .post(url.clone())
            .json(&ListRequest::by_id(start, &self.select))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Upstream answered {} for start={}", status, start);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: serde_json::from_str::<Value>(&body).ok(),
            });
        }

        match parse_list_page(&body) {
            Some(list_page) => {
                if page == 1
                    && let Some(total) = list_page.total
                {
                    debug!("Upstream reports {} records in total", total);
                }
                Ok(Some(list_page.records))
            }
            None => {
                warn!(
                    "Malformed list response at start={}, keeping {} page(s) already fetched: {}",
                    start,
                    page - 1,
                    preview(&body)
                );
                Ok(None)
            }
        }
    }

    fn method_url(&self, webhook: &str) -> Result<Url> {
        let base = webhook.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{}/{}", base, self.method))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(FetchError::InvalidUrl(format!("unsupported scheme '{}'", scheme))),
        }
    }
}

fn preview(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
