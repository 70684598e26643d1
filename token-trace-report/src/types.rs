//! Core types for the token-trace report library
//!
//! This module defines the record model the builder emits and the parser
//! reconstructs. All values are computed at report-build time - nothing in a
//! finished report is ever mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type used for the report generation stamp
pub type Timestamp = DateTime<Utc>;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Class tag assigned to tokens that match no class definition
pub const UNKNOWN_CLASS: &str = "UNKNOWN";

/// A raw token sample from an input stream (JSONL)
///
/// This is one labeled unit as read from the token stream, before class
/// lookup or any derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSample {
    /// Text label of the traced unit
    pub token: String,
    /// Kernel distance metric
    pub k_dist: u32,
    /// Hazard distance metric
    pub h_dist: u32,
    /// Exit distance metric
    pub e_dist: u32,
    /// Free-text annotation (optional)
    #[serde(default)]
    pub note: Option<String>,
    /// True if a new major cycle starts at this sample
    #[serde(default)]
    pub cycle_break: bool,
}

/// Errors that can occur while building, parsing, or rendering reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to parse token stream: line {line}: {message}")]
    TokenParseError { line: usize, message: String },

    #[error("Failed to parse class file: {0}")]
    ClassParseError(String),

    #[error("Failed to parse report: line {line}: {message}")]
    ReportParseError { line: usize, message: String },

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Cycle label assigned to each row, rendered as `major.minor`
///
/// Labels are lexicographically non-decreasing down a well-formed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CycleId {
    pub major: u32,
    pub minor: u32,
}

impl CycleId {
    /// First cycle of a report
    pub fn initial() -> Self {
        Self { major: 1, minor: 1 }
    }

    /// Start the next major cycle (minor resets)
    pub fn next_major(self) -> Self {
        Self {
            major: self.major + 1,
            minor: 1,
        }
    }

    /// Start the next sub-cycle within the current major cycle
    pub fn next_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for CycleId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("Invalid cycle label '{}': expected major.minor", s))?;
        let major = major
            .parse::<u32>()
            .map_err(|e| format!("Invalid cycle major in '{}': {}", s, e))?;
        let minor = minor
            .parse::<u32>()
            .map_err(|e| format!("Invalid cycle minor in '{}': {}", s, e))?;
        Ok(Self { major, minor })
    }
}

/// One row of the trace table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// 1-based sequence index, contiguous within a report
    pub position: u32,
    /// Text label of the traced unit
    pub token: String,
    /// Class tag from the class database, or `UNKNOWN`
    pub class: String,
    /// Kernel distance metric
    pub k_dist: u32,
    /// Hazard distance metric
    pub h_dist: u32,
    /// Exit distance metric
    pub e_dist: u32,
    /// Minimum of the three distance metrics
    pub min_dist: u32,
    /// True iff a hazard class is assigned
    pub hazard_adj: bool,
    /// Hazard classification tag (None rendered as `-`)
    pub hazard_class: Option<String>,
    /// Cycle label
    pub cycle: CycleId,
    /// Free-text annotation (empty rendered as `-`)
    pub notes: String,
}

impl TokenRecord {
    /// Recompute the minimum distance from the three metric columns
    pub fn recomputed_min(&self) -> u32 {
        self.k_dist.min(self.h_dist).min(self.e_dist)
    }

    /// True if this row touches the kernel at the given contact threshold
    pub fn is_kernel_contact(&self, threshold: u32) -> bool {
        self.min_dist <= threshold
    }
}

/// An inclusive range of row positions, rendered zero-padded (`0004-0011`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub start: u32,
    pub end: u32,
}

impl PositionRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of rows covered by this range
    pub fn len(&self) -> usize {
        (self.end.saturating_sub(self.start) as usize) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.end)
    }
}

impl FromStr for PositionRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid position range '{}': expected start-end", s))?;
        let start = start
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("Invalid range start in '{}': {}", s, e))?;
        let end = end
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("Invalid range end in '{}': {}", s, e))?;
        Ok(Self { start, end })
    }
}

/// Aggregate counts for the trailing Summary Statistics block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Rows with `min_dist` at or below the contact threshold
    pub kernel_contacts: usize,
    /// Rows entering the hazard-adjacent state (rising edges of the flag)
    pub hazard_transitions: usize,
    /// Maximal multi-step navigation runs, as position ranges
    pub navigation_sequences: Vec<PositionRange>,
}

/// A complete trace report: rows plus the summary computed from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceReport {
    /// Generation stamp; None for parsed reports that carry no stamp
    pub generated_at: Option<Timestamp>,
    /// All rows, in position order
    pub records: Vec<TokenRecord>,
    /// Aggregate statistics as printed in the report
    pub summary: SummaryStats,
}

impl TraceReport {
    /// Number of rows in the report
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
