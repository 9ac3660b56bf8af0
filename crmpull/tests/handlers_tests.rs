use crmpull::handlers::*;
use crmpull_core::Settings;
use crmpull_core::export::ExportFormat;
use std::path::PathBuf;
use std::time::Duration;

fn settings_with_webhook(webhook: Option<&str>) -> Settings {
    Settings {
        webhook: webhook.map(str::to_string),
        ..Settings::default()
    }
}

#[test]
fn test_resolve_webhook_prefers_cli() {
    let settings = settings_with_webhook(Some("https://env.example.com/rest/1/a/"));
    let result = resolve_webhook(Some("https://cli.example.com/rest/1/b/"), &settings);
    assert_eq!(result, Ok("https://cli.example.com/rest/1/b/".to_string()));
}

#[test]
fn test_resolve_webhook_falls_back_to_settings() {
    let settings = settings_with_webhook(Some("https://env.example.com/rest/1/a/"));
    assert_eq!(
        resolve_webhook(None, &settings),
        Ok("https://env.example.com/rest/1/a/".to_string())
    );
    assert_eq!(
        resolve_webhook(Some("  "), &settings),
        Ok("https://env.example.com/rest/1/a/".to_string())
    );
}

#[test]
fn test_resolve_webhook_missing() {
    let result = resolve_webhook(None, &settings_with_webhook(None));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("BITRIX24_WEBHOOK"));
}

#[test]
fn test_resolve_output_path_expands_tilde() {
    let path = resolve_output_path("~/companies.csv", ExportFormat::Csv);
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("companies.csv"));

    assert_eq!(
        resolve_output_path("out/companies.json", ExportFormat::Json),
        PathBuf::from("out/companies.json")
    );
}

#[test]
fn test_resolve_output_path_adds_format_extension() {
    assert_eq!(resolve_output_path("out/companies", ExportFormat::Text), PathBuf::from("out/companies.txt"));
    assert_eq!(resolve_output_path("companies", ExportFormat::Csv), PathBuf::from("companies.csv"));
    assert_eq!(
        resolve_output_path("companies.dat", ExportFormat::Json),
        PathBuf::from("companies.dat")
    );
}

#[test]
fn test_apply_serve_overrides() {
    let host = "127.0.0.1".to_string();
    let port = 8088u16;
    let static_dir = PathBuf::from("/srv/crmpull");

    let settings = apply_serve_overrides(Settings::default(), Some(&host), Some(&port), Some(&static_dir));

    assert_eq!(settings.bind_address(), "127.0.0.1:8088");
    assert_eq!(settings.static_dir, static_dir);
}

#[test]
fn test_apply_serve_overrides_keeps_settings_without_flags() {
    let original = Settings {
        port: 4000,
        ..Settings::default()
    };
    let settings = apply_serve_overrides(original.clone(), None, None, None);
    assert_eq!(settings, original);
}

#[test]
fn test_format_status_never_prints_webhook() {
    colored::control::set_override(false);

    let settings = Settings {
        request_delay: Duration::from_millis(250),
        ..settings_with_webhook(Some("https://portal.example.com/rest/1/secret-token/"))
    };
    let status = format_status(&settings);

    assert!(status.contains("Webhook:        configured"));
    assert!(status.contains("Request delay:  250 ms"));
    assert!(status.contains("Listen address: 0.0.0.0:3000"));
    assert!(!status.contains("secret-token"));
}

#[test]
fn test_format_status_without_webhook() {
    colored::control::set_override(false);

    let status = format_status(&settings_with_webhook(None));
    assert!(status.contains("not configured"));
}
