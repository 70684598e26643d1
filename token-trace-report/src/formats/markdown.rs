//! Markdown report parser
//!
//! Parses a generated trace report back into typed records and the summary
//! block as printed. Prose around the table is tolerated; the table and the
//! Summary Statistics block themselves are parsed strictly, with errors
//! naming the 1-based line number.
//!
//! The parser never recomputes derived columns or summary counts - it keeps
//! what the file says so the validator can catch inconsistencies.

use crate::types::{
    CycleId, PositionRange, ReportError, Result, SummaryStats, TokenRecord, TraceReport,
};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Column headers of the trace table, in order
pub const COLUMNS: [&str; 11] = [
    "Position",
    "Token",
    "Class",
    "K_Dist",
    "H_Dist",
    "E_Dist",
    "Min_Dist",
    "Hazard_Adj",
    "Hazard_Class",
    "Cycle",
    "Notes",
];

/// Heading that opens the trailing aggregate block
pub const SUMMARY_HEADING: &str = "## Summary Statistics";

/// Label that opens the navigation range list
pub const RANGES_LABEL: &str = "Navigation sequence ranges:";

/// Markdown report parser
pub struct ReportParser;

impl ReportParser {
    /// Parse a report file into a `TraceReport`
    pub fn parse(path: &Path) -> Result<TraceReport> {
        log::info!("Parsing report: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse report text into a `TraceReport`
    pub fn parse_str(content: &str) -> Result<TraceReport> {
        let mut generated_at: Option<DateTime<Utc>> = None;
        let mut records: Vec<TokenRecord> = Vec::new();
        let mut table_done = false;
        let mut summary: Option<SummaryStats> = None;

        let mut lines = content.lines().enumerate().peekable();

        while let Some((idx, line)) = lines.next() {
            let line_number = idx + 1;
            let trimmed = line.trim();

            if let Some(stamp) = trimmed.strip_prefix("Generated:") {
                generated_at = Some(parse_generated(stamp.trim(), line_number)?);
                continue;
            }

            if !table_done && is_header_row(trimmed) {
                expect_separator(&mut lines)?;
                while let Some((row_idx, row_line)) = lines.peek() {
                    if !row_line.trim().starts_with('|') {
                        break;
                    }
                    let record = parse_row(row_line.trim(), row_idx + 1)?;
                    records.push(record);
                    lines.next();
                }
                table_done = true;
                continue;
            }

            if trimmed == SUMMARY_HEADING {
                if !table_done {
                    return Err(ReportError::ReportParseError {
                        line: line_number,
                        message: "Summary Statistics block before trace table".to_string(),
                    });
                }
                summary = Some(parse_summary(&mut lines, line_number)?);
                break;
            }
        }

        if !table_done {
            return Err(ReportError::ReportParseError {
                line: 0,
                message: "No trace table found".to_string(),
            });
        }
        let summary = summary.ok_or_else(|| ReportError::ReportParseError {
            line: 0,
            message: "Missing Summary Statistics block".to_string(),
        })?;

        log::info!("Parsed report with {} rows", records.len());

        Ok(TraceReport {
            generated_at,
            records,
            summary,
        })
    }
}

fn parse_generated(stamp: &str, line_number: usize) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ReportError::ReportParseError {
            line: line_number,
            message: format!("Invalid generation stamp '{}': {}", stamp, e),
        })
}

/// Split a `| a | b | c |` line into trimmed cells
fn split_cells(line: &str) -> Vec<&str> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(str::trim)
        .collect()
}

fn is_header_row(line: &str) -> bool {
    if !line.starts_with('|') {
        return false;
    }
    let cells = split_cells(line);
    cells.len() == COLUMNS.len() && cells.iter().zip(COLUMNS.iter()).all(|(a, b)| a == b)
}

fn is_separator_row(line: &str) -> bool {
    line.starts_with('|')
        && !line.is_empty()
        && line
            .chars()
            .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

fn expect_separator<'a, I>(lines: &mut std::iter::Peekable<I>) -> Result<()>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    match lines.next() {
        Some((_, line)) if is_separator_row(line.trim()) => Ok(()),
        Some((idx, _)) => Err(ReportError::ReportParseError {
            line: idx + 1,
            message: "Expected table separator row after header".to_string(),
        }),
        None => Err(ReportError::ReportParseError {
            line: 0,
            message: "Unexpected end of file after table header".to_string(),
        }),
    }
}

fn parse_row(line: &str, line_number: usize) -> Result<TokenRecord> {
    let cells = split_cells(line);
    if cells.len() != COLUMNS.len() {
        return Err(ReportError::ReportParseError {
            line: line_number,
            message: format!(
                "Expected {} columns, found {}",
                COLUMNS.len(),
                cells.len()
            ),
        });
    }

    let int = |cell: &str, name: &str| -> Result<u32> {
        cell.parse::<u32>()
            .map_err(|e| ReportError::ReportParseError {
                line: line_number,
                message: format!("Invalid {} value '{}': {}", name, cell, e),
            })
    };

    let hazard_adj = match cells[7] {
        "Y" => true,
        "N" => false,
        other => {
            return Err(ReportError::ReportParseError {
                line: line_number,
                message: format!("Invalid Hazard_Adj value '{}': expected Y or N", other),
            })
        }
    };

    let cycle = cells[9]
        .parse::<CycleId>()
        .map_err(|e| ReportError::ReportParseError {
            line: line_number,
            message: e,
        })?;

    Ok(TokenRecord {
        position: int(cells[0], "Position")?,
        token: cells[1].to_string(),
        class: cells[2].to_string(),
        k_dist: int(cells[3], "K_Dist")?,
        h_dist: int(cells[4], "H_Dist")?,
        e_dist: int(cells[5], "E_Dist")?,
        min_dist: int(cells[6], "Min_Dist")?,
        hazard_adj,
        hazard_class: match cells[8] {
            "-" | "" => None,
            tag => Some(tag.to_string()),
        },
        cycle,
        notes: match cells[10] {
            "-" => String::new(),
            text => text.to_string(),
        },
    })
}

fn parse_summary<'a, I>(
    lines: &mut std::iter::Peekable<I>,
    heading_line: usize,
) -> Result<SummaryStats>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut kernel_contacts: Option<usize> = None;
    let mut hazard_transitions: Option<usize> = None;
    let mut declared_sequences: Option<usize> = None;
    let mut ranges: Vec<PositionRange> = Vec::new();
    let mut in_ranges = false;

    for (idx, line) in lines {
        let line_number = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed == RANGES_LABEL {
            in_ranges = true;
            continue;
        }

        if let Some(bullet) = trimmed.strip_prefix("- ") {
            if in_ranges {
                let range =
                    bullet
                        .trim()
                        .parse::<PositionRange>()
                        .map_err(|e| ReportError::ReportParseError {
                            line: line_number,
                            message: e,
                        })?;
                ranges.push(range);
            } else if bullet.starts_with("Kernel contacts") {
                kernel_contacts = Some(parse_count(bullet, line_number)?);
            } else if bullet.starts_with("Hazard-adjacent transitions") {
                hazard_transitions = Some(parse_count(bullet, line_number)?);
            } else if bullet.starts_with("Navigation sequences") {
                declared_sequences = Some(parse_count(bullet, line_number)?);
            } else {
                return Err(ReportError::ReportParseError {
                    line: line_number,
                    message: format!("Unrecognized summary entry '{}'", bullet),
                });
            }
            continue;
        }

        return Err(ReportError::ReportParseError {
            line: line_number,
            message: format!("Unexpected content in summary block: '{}'", trimmed),
        });
    }

    let missing = |name: &str| ReportError::ReportParseError {
        line: heading_line,
        message: format!("Summary block is missing the '{}' entry", name),
    };
    let kernel_contacts = kernel_contacts.ok_or_else(|| missing("Kernel contacts"))?;
    let hazard_transitions =
        hazard_transitions.ok_or_else(|| missing("Hazard-adjacent transitions"))?;
    let declared_sequences = declared_sequences.ok_or_else(|| missing("Navigation sequences"))?;

    if declared_sequences != ranges.len() {
        return Err(ReportError::ReportParseError {
            line: heading_line,
            message: format!(
                "Navigation sequence count {} does not match {} listed ranges",
                declared_sequences,
                ranges.len()
            ),
        });
    }

    Ok(SummaryStats {
        kernel_contacts,
        hazard_transitions,
        navigation_sequences: ranges,
    })
}

/// Parse the integer after the final colon of a summary bullet
fn parse_count(bullet: &str, line_number: usize) -> Result<usize> {
    let value = bullet
        .rsplit_once(':')
        .map(|(_, v)| v.trim())
        .ok_or_else(|| ReportError::ReportParseError {
            line: line_number,
            message: format!("Summary entry '{}' has no count", bullet),
        })?;
    value
        .parse::<usize>()
        .map_err(|e| ReportError::ReportParseError {
            line: line_number,
            message: format!("Invalid summary count '{}': {}", value, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Token Trace Report

Generated: 2026-08-07T12:00:00+00:00

| Position | Token | Class | K_Dist | H_Dist | E_Dist | Min_Dist | Hazard_Adj | Hazard_Class | Cycle | Notes |
|----------|-------|-------|--------|--------|--------|----------|------------|--------------|-------|-------|
| 0001 | nav_start | NAV | 4 | 6 | 2 | 2 | N | - | 1.1 | - |
| 0002 | haz_edge | HZD | 3 | 1 | 4 | 1 | Y | H-EDGE | 1.1 | close pass |
| 0003 | k_gate | KER | 1 | 3 | 5 | 1 | N | - | 1.1 | - |

## Summary Statistics

- Kernel contacts (Min_Dist <= 1): 2
- Hazard-adjacent transitions: 1
- Navigation sequences (>= 3 steps): 1

Navigation sequence ranges:

- 0001-0003
";

    #[test]
    fn test_parse_complete_report() {
        let report = ReportParser::parse_str(SAMPLE).unwrap();

        assert!(report.generated_at.is_some());
        assert_eq!(report.len(), 3);

        let second = &report.records[1];
        assert_eq!(second.position, 2);
        assert_eq!(second.token, "haz_edge");
        assert_eq!(second.class, "HZD");
        assert!(second.hazard_adj);
        assert_eq!(second.hazard_class.as_deref(), Some("H-EDGE"));
        assert_eq!(second.notes, "close pass");
        assert_eq!(second.cycle, CycleId { major: 1, minor: 1 });

        assert_eq!(report.summary.kernel_contacts, 2);
        assert_eq!(report.summary.hazard_transitions, 1);
        assert_eq!(
            report.summary.navigation_sequences,
            vec![PositionRange::new(1, 3)]
        );
    }

    #[test]
    fn test_missing_summary_block() {
        let content = SAMPLE.split("## Summary").next().unwrap();
        let result = ReportParser::parse_str(content);
        assert!(matches!(
            result,
            Err(ReportError::ReportParseError { .. })
        ));
    }

    #[test]
    fn test_wrong_column_count_names_line() {
        let content = SAMPLE.replace("| 0003 | k_gate | KER | 1 | 3 | 5 | 1 | N | - | 1.1 | - |",
                                     "| 0003 | k_gate | KER | 1 | 3 |");
        match ReportParser::parse_str(&content) {
            Err(ReportError::ReportParseError { line, .. }) => assert_eq!(line, 9),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bad_hazard_flag() {
        let content = SAMPLE.replace("| 1 | Y | H-EDGE |", "| 1 | yes | H-EDGE |");
        assert!(ReportParser::parse_str(&content).is_err());
    }

    #[test]
    fn test_sequence_count_must_match_ranges() {
        let content = SAMPLE.replace("Navigation sequences (>= 3 steps): 1",
                                     "Navigation sequences (>= 3 steps): 2");
        assert!(ReportParser::parse_str(&content).is_err());
    }

    #[test]
    fn test_report_without_stamp_parses() {
        let content = SAMPLE.replace("Generated: 2026-08-07T12:00:00+00:00\n", "");
        let report = ReportParser::parse_str(&content).unwrap();
        assert!(report.generated_at.is_none());
    }
}
