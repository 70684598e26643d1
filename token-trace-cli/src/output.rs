//! Report output writing
//!
//! Writes finished reports to disk (markdown or JSON) and prints validation
//! findings for check mode.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use token_trace_report::{render_markdown, ReportConfig, TraceReport, ValidationIssue};

/// Derive the output path for a token stream input
///
/// `trace.jsonl` becomes `trace_trace_report.md` (or `.json`) in the output
/// directory, next to the input when no directory is configured.
pub fn output_path(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trace");
    let extension = match format {
        OutputFormat::Markdown => "md",
        OutputFormat::Json => "json",
    };
    let filename = format!("{}_trace_report.{}", stem, extension);

    match output_dir {
        Some(dir) => dir.join(filename),
        None => input.with_file_name(filename),
    }
}

/// Serialize a report in the requested format
pub fn render_report(
    report: &TraceReport,
    config: &ReportConfig,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(report, config)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report as JSON")
        }
    }
}

/// Write a report to disk, creating the output directory if needed
pub fn write_report(
    report: &TraceReport,
    config: &ReportConfig,
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
    }

    let content = render_report(report, config, format)?;
    fs::write(path, content).with_context(|| format!("Failed to write report: {:?}", path))?;

    log::info!("Wrote report: {:?}", path);
    Ok(())
}

/// Print validation findings, one per line
pub fn print_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        println!("  {}", issue);
    }
}
