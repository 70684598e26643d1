//! Token Trace Report Library
//!
//! A stateless, reusable library for building, parsing, rendering, and
//! validating token-level trace reports: a markdown table of labeled tokens
//! with distance metrics and derived columns, followed by aggregate summary
//! statistics.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on the report format:
//! - Parses JSONL token streams and loads TOML class definition files
//! - Derives per-row fields (class, Min_Dist, hazard flag, cycle numbering)
//! - Computes summary statistics (kernel contacts, hazard transitions,
//!   navigation sequences)
//! - Renders the canonical markdown layout and parses it back
//! - Validates reports against the format's consistency rules
//!
//! The library does NOT:
//! - Discover input files or route output
//! - Configure logging
//! - Process files in parallel
//!
//! All higher-level functionality is in the application layer
//! (token-trace-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use token_trace_report::{render_markdown, ReportConfig, TraceBuilder};
//! use std::path::Path;
//!
//! // Create builder and load class definitions
//! let mut builder = TraceBuilder::new();
//! builder.add_classes(Path::new("navigation.toml")).unwrap();
//!
//! // Configure thresholds
//! let config = ReportConfig::new()
//!     .with_contact_threshold(1)
//!     .with_min_navigation_len(3);
//!
//! // Build and render a report
//! let report = builder.build_file(Path::new("trace.jsonl"), &config).unwrap();
//! println!("{}", render_markdown(&report, &config));
//! ```

// Public modules
pub mod builder;
pub mod classes;
pub mod config;
pub mod formats;
pub mod render;
pub mod summary;
pub mod types;
pub mod validate;

// Re-export main types for convenience
pub use builder::TraceBuilder;
pub use classes::{ClassDatabase, DatabaseStats};
pub use config::ReportConfig;
pub use formats::{JsonlParser, ReportParser};
pub use render::render_markdown;
pub use types::{
    CycleId, PositionRange, ReportError, Result, SummaryStats, TokenRecord, TokenSample,
    TraceReport, UNKNOWN_CLASS,
};
pub use validate::{has_errors, validate, Severity, ValidationIssue};

// Internal modules (not exposed in public API)
mod derive;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
