//! Rendering of result sets.
//!
//! Provides conversion of a [`MatchResultSet`] to output formats:
//! - Plain Text - one block per record, `key: value` per line
//! - JSON - structured data for programmatic use
//! - Markdown - headers and field tables

use chrono::Utc;
use colored::Colorize;
use serde_json::Value;

use crate::asset_path::AssetPathRule;
use crate::model::types::{MatchEntry, MatchResultSet, Record};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// Plain text blocks
    #[default]
    #[value(name = "text")]
    PlainText,
    /// JSON format for programmatic consumption
    Json,
    /// Markdown format with headers and tables
    Markdown,
}

/// Options for export customization
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// When set, each hit also shows its derived asset path.
    pub asset_paths: Option<AssetPathRule>,
}

/// Export a result set to the specified format
pub fn export_results(
    results: &MatchResultSet,
    format: ExportFormat,
    options: &ExportOptions,
) -> String {
    match format {
        ExportFormat::PlainText => export_plain_text(results, options),
        ExportFormat::Json => export_json(results, options),
        ExportFormat::Markdown => export_markdown(results, options),
    }
}

/// Display form of a field value: strings raw, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `key: value` lines for one record, in field order.
pub fn record_lines(record: &Record) -> Vec<String> {
    record
        .iter()
        .map(|(k, v)| format!("{k}: {}", display_value(v)))
        .collect()
}

fn export_plain_text(results: &MatchResultSet, options: &ExportOptions) -> String {
    let mut output = String::new();

    for entry in &results.entries {
        match entry {
            MatchEntry::Hit { file, record } => {
                output.push_str(&format!("{}\n", format!("File: {}", file.relative_path).bold()));
                for line in record_lines(record) {
                    output.push_str(&format!("  {line}\n"));
                }
                if let Some(rule) = &options.asset_paths
                    && let Some(path) = rule.derive(&file.relative_path, record)
                {
                    output.push_str(&format!("  {} {path}\n", "->".cyan()));
                }
                output.push('\n');
            }
            MatchEntry::Error { message, .. } => {
                output.push_str(&format!("{}\n\n", message.red()));
            }
            MatchEntry::NotFound { message, .. } => {
                output.push_str(&format!("{}\n", message.yellow()));
            }
        }
    }

    output
}

fn export_json(results: &MatchResultSet, options: &ExportOptions) -> String {
    let entries: Vec<Value> = results
        .entries
        .iter()
        .map(|entry| {
            let mut obj = serde_json::to_value(entry).unwrap_or(Value::Null);
            if let (Some(rule), MatchEntry::Hit { file, record }) = (&options.asset_paths, entry)
                && let Some(path) = rule.derive(&file.relative_path, record)
            {
                obj["asset_path"] = Value::from(path);
            }
            obj
        })
        .collect();

    let export_data = serde_json::json!({
        "phrase": results.phrase,
        "count": results.hit_count(),
        "errors": results.error_count(),
        "exported_at": Utc::now().to_rfc3339(),
        "entries": entries,
    });

    serde_json::to_string_pretty(&export_data).unwrap_or_else(|_| "{}".to_string())
}

/// Escape special Markdown characters to prevent formatting issues or injection.
fn escape_markdown(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('`', "\\`")
}

fn export_markdown(results: &MatchResultSet, options: &ExportOptions) -> String {
    let mut output = String::new();

    output.push_str("# Search Results\n\n");
    output.push_str(&format!(
        "**Phrase:** `{}`\n\n",
        results.phrase.replace('`', "")
    ));
    output.push_str(&format!(
        "**Matches:** {} | **Errors:** {} | **Exported:** {}\n\n",
        results.hit_count(),
        results.error_count(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str("---\n\n");

    let mut n = 0;
    for entry in &results.entries {
        match entry {
            MatchEntry::Hit { file, record } => {
                n += 1;
                output.push_str(&format!(
                    "## {n}. `{}`\n\n",
                    file.relative_path.replace('`', "")
                ));
                output.push_str("| Field | Value |\n");
                output.push_str("|-------|-------|\n");
                for (k, v) in record {
                    output.push_str(&format!(
                        "| {} | {} |\n",
                        escape_markdown(k),
                        escape_markdown(&display_value(v)).replace('\n', "<br>")
                    ));
                }
                if let Some(rule) = &options.asset_paths
                    && let Some(path) = rule.derive(&file.relative_path, record)
                {
                    output.push_str(&format!("\n**Asset:** `{}`\n", path.replace('`', "")));
                }
                output.push('\n');
            }
            MatchEntry::Error { message, .. } => {
                output.push_str(&format!("> **Error:** {}\n\n", escape_markdown(message)));
            }
            MatchEntry::NotFound { message, .. } => {
                output.push_str(&format!("_{}_\n\n", escape_markdown(message)));
            }
        }
    }

    output
}
