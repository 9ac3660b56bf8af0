// Rendering fetched companies for the command line

use crmpull_client::Record;
use crmpull_client::fetcher::COMPANY_FIELDS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "text" | "txt" => Some(ExportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }
}

pub fn render(format: ExportFormat, companies: &[Record]) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => generate_json_export(companies),
        ExportFormat::Csv => Ok(generate_csv_export(companies)),
        ExportFormat::Text => Ok(generate_text_summary(companies)),
    }
}

pub fn generate_json_export(companies: &[Record]) -> Result<String, serde_json::Error> {
    let export = serde_json::json!({
        "metadata": {
            "generator": "crmpull",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "count": companies.len()
        },
        "companies": companies
    });

    serde_json::to_string_pretty(&export)
}

/// Known company fields first, in selection order, then any other keys
/// found in the records.
pub fn csv_columns(companies: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = COMPANY_FIELDS.iter().map(|f| f.to_string()).collect();

    let extra: BTreeSet<&String> = companies
        .iter()
        .flat_map(|record| record.keys())
        .filter(|key| !COMPANY_FIELDS.contains(&key.as_str()))
        .collect();
    columns.extend(extra.into_iter().cloned());

    columns
}

pub fn generate_csv_export(companies: &[Record]) -> String {
    let columns = csv_columns(companies);
    let mut csv = String::new();

    let header: Vec<String> = columns.iter().map(|c| escape_csv(c)).collect();
    csv.push_str(&header.join(","));
    csv.push_str("\r\n");

    for record in companies {
        let row: Vec<String> = columns
            .iter()
            .map(|column| escape_csv(&format_value(record.get(column))))
            .collect();
        csv.push_str(&row.join(","));
        csv.push_str("\r\n");
    }

    csv
}

pub fn generate_text_summary(companies: &[Record]) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                           CRM COMPANY EXPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Companies:    {}\n", companies.len()));
    report.push_str(&format!(
        "Generated:    {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if companies.is_empty() {
        report.push_str("No companies returned.\n");
        return report;
    }

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for record in companies {
        let company_type = match format_value(record.get("COMPANY_TYPE")) {
            t if t.is_empty() => "(none)".to_string(),
            t => t,
        };
        *by_type.entry(company_type).or_insert(0) += 1;
    }

    report.push_str("By type:\n");
    for (company_type, count) in &by_type {
        report.push_str(&format!("  {:<24} {}\n", company_type, count));
    }
    report.push('\n');

    report.push_str("Companies:\n");
    for record in companies {
        report.push_str(&format!(
            "  [{}] {}\n",
            format_value(record.get("ID")),
            format_value(record.get("TITLE"))
        ));
    }

    report
}

pub fn save_export(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Flatten a field value into a single cell.
///
/// Multi-fields (`PHONE`, `EMAIL`, `WEB`) arrive as arrays of
/// `{ "VALUE": .., "VALUE_TYPE": .. }` and are joined on their values.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => {
            let values: Option<Vec<String>> = items
                .iter()
                .map(|item| item.get("VALUE").map(|v| format_value(Some(v))))
                .collect();
            match values {
                Some(values) => values.join("; "),
                None => Value::Array(items.clone()).to_string(),
            }
        }
        Some(other) => other.to_string(),
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
