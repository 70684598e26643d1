//! Summary statistics
//!
//! Scans finished rows and produces the aggregate block printed at the end
//! of each report: kernel contacts, hazard-adjacent transitions, and
//! multi-step navigation sequences.

use crate::config::ReportConfig;
use crate::types::{PositionRange, SummaryStats, TokenRecord};

/// Compute summary statistics from the rows of a report
pub fn compute(records: &[TokenRecord], config: &ReportConfig) -> SummaryStats {
    SummaryStats {
        kernel_contacts: kernel_contacts(records, config.contact_threshold),
        hazard_transitions: hazard_transitions(records),
        navigation_sequences: navigation_sequences(records, config),
    }
}

/// Count rows at or below the kernel contact threshold
pub fn kernel_contacts(records: &[TokenRecord], threshold: u32) -> usize {
    records
        .iter()
        .filter(|r| r.is_kernel_contact(threshold))
        .count()
}

/// Count rows entering the hazard-adjacent state
///
/// A transition is a flagged row whose predecessor is unflagged; a flagged
/// first row counts as one.
pub fn hazard_transitions(records: &[TokenRecord]) -> usize {
    let mut count = 0;
    let mut previous_flagged = false;
    for record in records {
        if record.hazard_adj && !previous_flagged {
            count += 1;
        }
        previous_flagged = record.hazard_adj;
    }
    count
}

/// Find navigation sequences: maximal runs of consecutive rows with
/// non-increasing `min_dist`, at least `min_navigation_len` rows long,
/// ending in a kernel contact
///
/// Maximal runs are disjoint, so the returned ranges never overlap.
pub fn navigation_sequences(records: &[TokenRecord], config: &ReportConfig) -> Vec<PositionRange> {
    let mut sequences = Vec::new();
    if records.is_empty() {
        return sequences;
    }

    let mut run_start = 0;
    for i in 1..=records.len() {
        let run_ends = i == records.len() || records[i].min_dist > records[i - 1].min_dist;
        if !run_ends {
            continue;
        }
        let run = &records[run_start..i];
        let last = &run[run.len() - 1];
        if run.len() >= config.min_navigation_len
            && last.is_kernel_contact(config.contact_threshold)
        {
            sequences.push(PositionRange::new(run[0].position, last.position));
        }
        run_start = i;
    }

    sequences
}
