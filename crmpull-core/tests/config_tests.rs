// Tests for settings loading

use crmpull_core::config::{ConfigError, ENV_BATCH_SIZE, ENV_PORT, Settings};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_defaults_when_nothing_is_set() {
    let settings = settings_from(&[]).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.webhook, None);
    assert_eq!(settings.port, 3000);
    assert_eq!(settings.max_companies, 10_000);
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.request_delay, Duration::from_millis(100));
    assert_eq!(settings.static_dir, PathBuf::from("public"));
    assert!(!settings.webhook_configured());
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let settings = settings_from(&[("BITRIX24_WEBHOOK", "   "), ("PORT", "")]).unwrap();

    assert_eq!(settings.webhook, None);
    assert_eq!(settings.port, 3000);
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_all_values_overridden() {
    let settings = settings_from(&[
        ("BITRIX24_WEBHOOK", " https://portal.example.com/rest/1/abc/ "),
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("MAX_COMPANIES", "250"),
        ("BATCH_SIZE", "50"),
        ("REQUEST_DELAY_MS", "0"),
        ("REQUEST_TIMEOUT_SECS", "5"),
        ("STATIC_DIR", "/srv/www"),
    ])
    .unwrap();

    assert_eq!(
        settings.webhook.as_deref(),
        Some("https://portal.example.com/rest/1/abc/")
    );
    assert!(settings.webhook_configured());
    assert_eq!(settings.bind_address(), "127.0.0.1:8080");
    assert_eq!(settings.max_companies, 250);
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.request_delay, Duration::ZERO);
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.static_dir, PathBuf::from("/srv/www"));
}

// ============================================================================
// Invalid values
// ============================================================================

#[test]
fn test_invalid_port() {
    let err = settings_from(&[("PORT", "http")]).unwrap_err();

    match err {
        ConfigError::InvalidValue { key, value, .. } => {
            assert_eq!(key, ENV_PORT);
            assert_eq!(value, "http");
        }
    }
}

#[test]
fn test_batch_size_above_upstream_page() {
    let err = settings_from(&[("BATCH_SIZE", "100")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_BATCH_SIZE));
    assert!(err.to_string().contains("exactly 50"));
}

#[test]
fn test_batch_size_below_upstream_page() {
    let err = settings_from(&[("BATCH_SIZE", "25")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "25"));
}

#[test]
fn test_batch_size_zero() {
    assert!(settings_from(&[("BATCH_SIZE", "0")]).is_err());
}

#[test]
fn test_zero_timeout_rejected() {
    assert!(settings_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
}

#[test]
fn test_negative_limit_rejected() {
    assert!(settings_from(&[("MAX_COMPANIES", "-1")]).is_err());
}
