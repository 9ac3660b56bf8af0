// Runtime settings, read from the environment (and a .env file when present)

use crmpull_client::fetcher::{DEFAULT_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_WEBHOOK: &str = "BITRIX24_WEBHOOK";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MAX_COMPANIES: &str = "MAX_COMPANIES";
pub const ENV_BATCH_SIZE: &str = "BATCH_SIZE";
pub const ENV_REQUEST_DELAY_MS: &str = "REQUEST_DELAY_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub webhook: Option<String>,
    pub host: String,
    pub port: u16,
    pub max_companies: usize,
    pub page_size: usize,
    pub request_delay: Duration,
    pub request_timeout_secs: u64,
    pub static_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_companies: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or blank keys fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let page_size = parse_or(ENV_BATCH_SIZE, get(ENV_BATCH_SIZE), defaults.page_size)?;
        // The list methods always answer with up to 50 rows from `start`; a
        // smaller stride makes consecutive pages overlap.
        if page_size != DEFAULT_PAGE_SIZE {
            return Err(invalid(
                ENV_BATCH_SIZE,
                page_size.to_string(),
                format!("the CRM returns pages of exactly {} records", DEFAULT_PAGE_SIZE),
            ));
        }

        let request_timeout_secs = parse_or(
            ENV_REQUEST_TIMEOUT_SECS,
            get(ENV_REQUEST_TIMEOUT_SECS),
            defaults.request_timeout_secs,
        )?;
        if request_timeout_secs == 0 {
            return Err(invalid(
                ENV_REQUEST_TIMEOUT_SECS,
                "0".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let delay_ms = parse_or(
            ENV_REQUEST_DELAY_MS,
            get(ENV_REQUEST_DELAY_MS),
            DEFAULT_REQUEST_DELAY_MS,
        )?;

        Ok(Self {
            webhook: get(ENV_WEBHOOK),
            host: get(ENV_HOST).unwrap_or(defaults.host),
            port: parse_or(ENV_PORT, get(ENV_PORT), defaults.port)?,
            max_companies: parse_or(ENV_MAX_COMPANIES, get(ENV_MAX_COMPANIES), defaults.max_companies)?,
            page_size,
            request_delay: Duration::from_millis(delay_ms),
            request_timeout_secs,
            static_dir: get(ENV_STATIC_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        })
    }

    pub fn webhook_configured(&self) -> bool {
        self.webhook.is_some()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| invalid(key, value.clone(), e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: String, reason: String) -> ConfigError {
    ConfigError::InvalidValue { key, value, reason }
}
