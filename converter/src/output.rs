//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_summary, format_scan, to_json
//! @ai:module:depends_on session
//! @ai:module:stateless true

use crate::session::{ConversionSummary, FileStatus, ScanEntry};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a conversion summary as a string
/// @ai:effects pure
pub fn format_summary(summary: &ConversionSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(summary, false),
        OutputFormat::JsonPretty => to_json(summary, true),
        OutputFormat::Text => format_summary_text(summary),
    }
}

/// @ai:intent Format a conversion summary as human-readable text
/// @ai:effects pure
fn format_summary_text(summary: &ConversionSummary) -> String {
    let mut output = String::new();

    for file in &summary.files {
        let path = file.path.display().to_string();
        match &file.status {
            FileStatus::Converted { report } => {
                output.push_str(&format!(
                    "{} {} - {} annotation(s) replaced\n",
                    "CONVERTED".green().bold(),
                    path,
                    report.converted
                ));
                for name in &report.synthesized {
                    output.push_str(&format!("  {} {}\n", "synthesized:".cyan(), name));
                }
                for marker in &report.markers {
                    output.push_str(&format!(
                        "  {} {} ({})\n",
                        "review:".yellow(),
                        marker.text,
                        marker.declaration.dimmed()
                    ));
                }
            }
            FileStatus::Unchanged => {
                output.push_str(&format!("{} {}\n", "UNCHANGED".blue(), path.dimmed()));
            }
            FileStatus::Failed { error } => {
                output.push_str(&format!("{} {} - {}\n", "FAILED".red().bold(), path, error));
            }
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Processed {} files: {} converted, {} unchanged\n",
        summary.files.len(),
        summary.converted,
        summary.unchanged
    ));

    if summary.cancelled {
        output.push_str(&format!(
            "{} Run cancelled before all files were visited\n",
            "WARN".yellow().bold()
        ));
    }
    if summary.dry_run {
        output.push_str(&format!("{} Dry run, nothing was written\n", "INFO".blue()));
    }

    let markers = summary.marker_count();
    if summary.failed > 0 {
        output.push_str(&format!(
            "{} failed, {} marker(s) to review\n",
            summary.failed.to_string().red().bold(),
            markers.to_string().yellow()
        ));
    } else if markers > 0 {
        output.push_str(&format!(
            "{} {} marker(s) to review\n",
            "OK".green().bold(),
            markers.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} Nothing left to review\n", "OK".green().bold()));
    }

    output
}

/// @ai:intent Format scan results as a string
/// @ai:effects pure
pub fn format_scan(entries: &[ScanEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(entries, false),
        OutputFormat::JsonPretty => to_json(entries, true),
        OutputFormat::Text => format_scan_text(entries),
    }
}

fn format_scan_text(entries: &[ScanEntry]) -> String {
    let mut output = String::new();

    for entry in entries {
        output.push_str(&format!("{}\n", entry.path.display().to_string().bold()));
        for found in &entry.uses {
            output.push_str(&format!("  @{} on {}\n", found.annotation.cyan(), found.declaration));
        }
    }

    let total: usize = entries.iter().map(|e| e.uses.len()).sum();
    if total == 0 {
        output.push_str(&format!("{} No legacy annotations found\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "\n{} legacy annotation(s) in {} file(s)\n",
            total.to_string().yellow(),
            entries.len()
        ));
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
