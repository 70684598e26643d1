//! Main builder API
//!
//! This module provides the primary interface for the library. The
//! TraceBuilder struct is the entry point for loading class definitions and
//! building reports from token streams.

use crate::classes::{ClassDatabase, DatabaseStats};
use crate::config::ReportConfig;
use crate::derive::RowDeriver;
use crate::formats::JsonlParser;
use crate::summary;
use crate::types::{ReportError, Result, TokenSample, TraceReport};
use chrono::Utc;
use std::path::Path;

/// The main builder struct - entry point for report generation
pub struct TraceBuilder {
    /// Internal class database (loaded from class definition files)
    class_db: ClassDatabase,
}

impl TraceBuilder {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            class_db: ClassDatabase::new(),
        }
    }

    /// Load a class definition file and add its entries to the database
    ///
    /// # Arguments
    /// * `path` - Path to the TOML class file
    ///
    /// # Example
    /// ```no_run
    /// use token_trace_report::TraceBuilder;
    /// use std::path::Path;
    ///
    /// let mut builder = TraceBuilder::new();
    /// builder.add_classes(Path::new("navigation.toml")).unwrap();
    /// ```
    pub fn add_classes(&mut self, path: &Path) -> Result<()> {
        log::info!("Loading class file: {:?}", path);

        let definitions = crate::classes::loader::parse_class_file(path)?;
        for definition in definitions {
            self.class_db.add_definition(definition);
        }

        log::info!("Class file loaded successfully: {:?}", path);
        Ok(())
    }

    /// Build a report from a token stream file
    ///
    /// The input format is selected by file extension; `.jsonl` and
    /// `.ndjson` streams are supported.
    ///
    /// # Example
    /// ```no_run
    /// use token_trace_report::{ReportConfig, TraceBuilder};
    /// use std::path::Path;
    ///
    /// let builder = TraceBuilder::new();
    /// let config = ReportConfig::new().with_contact_threshold(1);
    /// let report = builder.build_file(Path::new("trace.jsonl"), &config).unwrap();
    /// println!("{} rows", report.len());
    /// ```
    pub fn build_file(&self, path: &Path, config: &ReportConfig) -> Result<TraceReport> {
        log::info!("Building report from token stream: {:?}", path);

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("jsonl") | Some("ndjson") => {
                log::debug!("Detected JSONL token stream");
                let samples = JsonlParser::parse(path)?.collect::<Result<Vec<_>>>()?;
                Ok(self.build_from_samples(samples, config))
            }
            _ => Err(ReportError::UnsupportedFormat(format!(
                "{:?}",
                extension
            ))),
        }
    }

    /// Build a report from in-memory token samples
    ///
    /// Rows are derived in stream order; the summary is computed from the
    /// finished rows and the report is stamped with the current time.
    pub fn build_from_samples(
        &self,
        samples: impl IntoIterator<Item = TokenSample>,
        config: &ReportConfig,
    ) -> TraceReport {
        let mut deriver = RowDeriver::new(&self.class_db, config);
        let records: Vec<_> = samples
            .into_iter()
            .map(|sample| deriver.derive(sample))
            .collect();

        log::info!("Derived {} rows", records.len());

        let summary = summary::compute(&records, config);

        TraceReport {
            generated_at: Some(Utc::now()),
            records,
            summary,
        }
    }

    /// Get statistics about the loaded class database
    pub fn database_stats(&self) -> DatabaseStats {
        self.class_db.stats()
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
