use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use crmpull_client::FetchRequest;
use crmpull_core::Settings;
use crmpull_core::export::{ExportFormat, render, save_export};
use crmpull_core::fetch::{FetchOptions, build_fetcher, execute_fetch};
use std::path::{Path, PathBuf};
use tracing::debug;

// Helper functions for the handlers

/// Pick the webhook from the command line, falling back to settings
pub fn resolve_webhook(cli_webhook: Option<&str>, settings: &Settings) -> Result<String, String> {
    cli_webhook
        .map(str::trim)
        .filter(|hook| !hook.is_empty())
        .map(str::to_string)
        .or_else(|| settings.webhook.clone())
        .ok_or_else(|| "No webhook given. Use --webhook or set BITRIX24_WEBHOOK".to_string())
}

/// Expand `~` in a user-supplied output path and add the format's extension
/// when the path has none
pub fn resolve_output_path(raw: &str, format: ExportFormat) -> PathBuf {
    let mut path = PathBuf::from(shellexpand::tilde(raw).as_ref());
    if path.extension().is_none() {
        path.set_extension(format.extension());
    }
    path
}

/// Command-line flags win over environment settings
pub fn apply_serve_overrides(
    mut settings: Settings,
    host: Option<&String>,
    port: Option<&u16>,
    static_dir: Option<&PathBuf>,
) -> Settings {
    if let Some(host) = host {
        settings.host = host.clone();
    }
    if let Some(port) = port {
        settings.port = *port;
    }
    if let Some(static_dir) = static_dir {
        settings.static_dir = static_dir.clone();
    }
    settings
}

pub fn format_status(settings: &Settings) -> String {
    let configured = if settings.webhook_configured() {
        "configured".green().to_string()
    } else {
        "not configured".yellow().to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", "Configuration".bright_white().bold()));
    out.push_str(&format!("  Webhook:        {}\n", configured));
    out.push_str(&format!("  Listen address: {}\n", settings.bind_address()));
    out.push_str(&format!("  Static dir:     {}\n", settings.static_dir.display()));
    out.push_str(&format!("  Max companies:  {}\n", settings.max_companies));
    out.push_str(&format!("  Page size:      {}\n", settings.page_size));
    out.push_str(&format!("  Request delay:  {} ms\n", settings.request_delay.as_millis()));
    out.push_str(&format!("  Timeout:        {} s\n", settings.request_timeout_secs));
    out
}

pub async fn handle_serve(args: &ArgMatches, settings: Settings) -> anyhow::Result<()> {
    let settings = apply_serve_overrides(
        settings,
        args.get_one::<String>("host"),
        args.get_one::<u16>("port"),
        args.get_one::<PathBuf>("static-dir"),
    );

    crmpull_server::run(settings).await
}

pub async fn handle_fetch(args: &ArgMatches, settings: Settings) -> anyhow::Result<()> {
    let webhook = resolve_webhook(args.get_one::<String>("webhook").map(String::as_str), &settings)
        .map_err(|e| anyhow!(e))?;
    let limit = args
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(settings.max_companies);
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ExportFormat::from_str(f))
        .unwrap_or(ExportFormat::Json);
    let output = args
        .get_one::<String>("output")
        .map(|p| resolve_output_path(p, format));
    let show_progress = !args.get_flag("no-progress");

    debug!("Fetching up to {} companies as {:?}", limit, format);

    let fetcher = build_fetcher(&settings).context("failed to build HTTP client")?;
    let options = FetchOptions {
        request: FetchRequest::new(webhook, limit),
        show_progress,
    };

    let companies = match execute_fetch(&fetcher, options, None).await {
        Ok(companies) => companies,
        Err(e) => {
            if let Some(details) = e.details() {
                eprintln!("{} Upstream error details: {}", "✗".red().bold(), details);
            }
            return Err(e).context("fetching companies failed");
        }
    };

    let content = render(format, &companies).context("failed to render export")?;

    match output {
        Some(path) => write_export(&content, &path, companies.len()),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

fn write_export(content: &str, path: &Path, count: usize) -> anyhow::Result<()> {
    save_export(content, path).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!(
        "{} Saved {} companies to {}",
        "✓".green().bold(),
        count.to_string().cyan(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

pub fn handle_status(settings: &Settings) {
    print!("{}", format_status(settings));
}
