//! Markdown report rendering
//!
//! Renders a `TraceReport` into the canonical report layout: title and
//! generation stamp, the aligned trace table with zero-padded positions, and
//! the trailing Summary Statistics block.

use crate::config::ReportConfig;
use crate::formats::markdown::{COLUMNS, RANGES_LABEL, SUMMARY_HEADING};
use crate::types::{TokenRecord, TraceReport};
use chrono::SecondsFormat;
use std::fmt::Write;

/// Render a complete report as markdown text
pub fn render_markdown(report: &TraceReport, config: &ReportConfig) -> String {
    let mut out = String::new();

    out.push_str("# Token Trace Report\n\n");
    if let Some(stamp) = report.generated_at {
        let _ = writeln!(
            out,
            "Generated: {}\n",
            stamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    render_table(&mut out, &report.records, config);
    out.push('\n');
    render_summary(&mut out, report, config);

    out
}

fn render_table(out: &mut String, records: &[TokenRecord], config: &ReportConfig) {
    let rows: Vec<Vec<String>> = records.iter().map(|r| row_cells(r, config)).collect();

    // Column widths: headers padded out by the widest cell beneath them
    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let header: Vec<String> = COLUMNS.iter().map(|h| h.to_string()).collect();
    write_row(out, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &separator, &widths);
    for row in &rows {
        write_row(out, row, &widths);
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths.iter()) {
        let _ = write!(out, " {:<width$} |", cell, width = width);
    }
    out.push('\n');
}

fn row_cells(record: &TokenRecord, config: &ReportConfig) -> Vec<String> {
    vec![
        format!("{:0width$}", record.position, width = config.position_width),
        sanitize(&record.token),
        sanitize(&record.class),
        record.k_dist.to_string(),
        record.h_dist.to_string(),
        record.e_dist.to_string(),
        record.min_dist.to_string(),
        if record.hazard_adj { "Y" } else { "N" }.to_string(),
        record
            .hazard_class
            .as_deref()
            .map(sanitize)
            .unwrap_or_else(|| "-".to_string()),
        record.cycle.to_string(),
        if record.notes.is_empty() {
            "-".to_string()
        } else {
            sanitize(&record.notes)
        },
    ]
}

/// Table cells must not contain pipes
fn sanitize(text: &str) -> String {
    text.replace('|', "/")
}

fn render_summary(out: &mut String, report: &TraceReport, config: &ReportConfig) {
    let summary = &report.summary;
    let _ = writeln!(out, "{}\n", SUMMARY_HEADING);
    let _ = writeln!(
        out,
        "- Kernel contacts (Min_Dist <= {}): {}",
        config.contact_threshold, summary.kernel_contacts
    );
    let _ = writeln!(
        out,
        "- Hazard-adjacent transitions: {}",
        summary.hazard_transitions
    );
    let _ = writeln!(
        out,
        "- Navigation sequences (>= {} steps): {}",
        config.min_navigation_len,
        summary.navigation_sequences.len()
    );

    if !summary.navigation_sequences.is_empty() {
        let _ = writeln!(out, "\n{}\n", RANGES_LABEL);
        for range in &summary.navigation_sequences {
            let _ = writeln!(
                out,
                "- {:0width$}-{:0width$}",
                range.start,
                range.end,
                width = config.position_width
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CycleId, SummaryStats, UNKNOWN_CLASS};

    fn record(position: u32) -> TokenRecord {
        TokenRecord {
            position,
            token: format!("tok_{}", position),
            class: UNKNOWN_CLASS.to_string(),
            k_dist: 2,
            h_dist: 3,
            e_dist: 4,
            min_dist: 2,
            hazard_adj: false,
            hazard_class: None,
            cycle: CycleId::initial(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_render_empty_report() {
        let report = TraceReport {
            generated_at: None,
            records: Vec::new(),
            summary: SummaryStats::default(),
        };
        let text = render_markdown(&report, &ReportConfig::default());

        assert!(text.contains("| Position |"));
        assert!(text.contains("- Kernel contacts (Min_Dist <= 1): 0"));
        assert!(!text.contains("Navigation sequence ranges:"));
        assert!(!text.contains("Generated:"));
    }

    #[test]
    fn test_positions_are_zero_padded() {
        let report = TraceReport {
            generated_at: None,
            records: vec![record(7)],
            summary: SummaryStats::default(),
        };
        let text = render_markdown(&report, &ReportConfig::default());
        assert!(text.contains("| 0007"));
    }

    #[test]
    fn test_wide_positions_render_at_natural_width() {
        let report = TraceReport {
            generated_at: None,
            records: vec![record(123456)],
            summary: SummaryStats::default(),
        };
        let text = render_markdown(&report, &ReportConfig::default());
        assert!(text.contains("| 123456"));
    }

    #[test]
    fn test_pipes_in_tokens_are_sanitized() {
        let mut rec = record(1);
        rec.token = "a|b".to_string();
        rec.notes = "c|d".to_string();
        let report = TraceReport {
            generated_at: None,
            records: vec![rec],
            summary: SummaryStats::default(),
        };
        let text = render_markdown(&report, &ReportConfig::default());
        assert!(text.contains("a/b"));
        assert!(text.contains("c/d"));
    }
}
