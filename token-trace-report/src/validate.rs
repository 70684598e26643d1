//! Report consistency validation
//!
//! Checks a report (typically a parsed one) against the format's
//! consistency rules: derived columns match their inputs, positions are
//! contiguous, cycle labels never go backwards, and the printed summary
//! matches recomputation from the rows.

use crate::config::ReportConfig;
use crate::summary;
use crate::types::{TraceReport, UNKNOWN_CLASS};
use std::fmt;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The report violates a format rule
    Error,
    /// Suspicious but not a rule violation
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Row position the issue anchors to (None for report-level issues)
    pub position: Option<u32>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{}: row {:04}: {}", self.severity, position, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// True if any issue has error severity
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Validate a report; returns an empty list when it is consistent
pub fn validate(report: &TraceReport, config: &ReportConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_rows(report, &mut issues);
    check_summary(report, config, &mut issues);

    log::debug!("Validation produced {} issue(s)", issues.len());
    issues
}

fn check_rows(report: &TraceReport, issues: &mut Vec<ValidationIssue>) {
    let mut previous_cycle = None;

    for (i, record) in report.records.iter().enumerate() {
        let expected_position = (i + 1) as u32;
        if record.position != expected_position {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                position: Some(record.position),
                message: format!(
                    "Position {} breaks the contiguous sequence (expected {})",
                    record.position, expected_position
                ),
            });
        }

        if record.min_dist != record.recomputed_min() {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                position: Some(record.position),
                message: format!(
                    "Min_Dist {} does not equal min(K_Dist, H_Dist, E_Dist) = {}",
                    record.min_dist,
                    record.recomputed_min()
                ),
            });
        }

        if record.hazard_adj != record.hazard_class.is_some() {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                position: Some(record.position),
                message: format!(
                    "Hazard_Adj is {} but Hazard_Class is {}",
                    if record.hazard_adj { "Y" } else { "N" },
                    record.hazard_class.as_deref().unwrap_or("-")
                ),
            });
        }

        if record.class == UNKNOWN_CLASS && record.hazard_class.is_some() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                position: Some(record.position),
                message: "Hazard class assigned to an UNKNOWN token".to_string(),
            });
        }

        if let Some(previous) = previous_cycle {
            if record.cycle < previous {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    position: Some(record.position),
                    message: format!(
                        "Cycle {} goes backwards (previous row was {})",
                        record.cycle, previous
                    ),
                });
            }
        }
        previous_cycle = Some(record.cycle);
    }
}

fn check_summary(report: &TraceReport, config: &ReportConfig, issues: &mut Vec<ValidationIssue>) {
    let expected = summary::compute(&report.records, config);
    let printed = &report.summary;

    if printed.kernel_contacts != expected.kernel_contacts {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            position: None,
            message: format!(
                "Kernel contact count {} does not match recomputed {}",
                printed.kernel_contacts, expected.kernel_contacts
            ),
        });
    }

    if printed.hazard_transitions != expected.hazard_transitions {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            position: None,
            message: format!(
                "Hazard-adjacent transition count {} does not match recomputed {}",
                printed.hazard_transitions, expected.hazard_transitions
            ),
        });
    }

    if printed.navigation_sequences != expected.navigation_sequences {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            position: None,
            message: format!(
                "Navigation sequences {:?} do not match recomputed {:?}",
                printed
                    .navigation_sequences
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>(),
                expected
                    .navigation_sequences
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
            ),
        });
    }
}
