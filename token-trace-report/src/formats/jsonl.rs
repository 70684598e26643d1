//! JSONL token stream parser
//!
//! Parses token-sample input files: one JSON object per line, blank lines
//! skipped. Each object carries the token label, the three distance metrics,
//! and optional `note` / `cycle_break` fields.

use crate::types::{ReportError, Result, TokenSample};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// JSONL token stream parser
pub struct JsonlParser;

impl JsonlParser {
    /// Parse a JSONL file and return an iterator over token samples
    ///
    /// Opens the file and returns an iterator that yields one
    /// `TokenSample` per non-blank line. Parse failures name the 1-based
    /// line number.
    pub fn parse(path: &Path) -> Result<JsonlSampleIterator> {
        log::info!("Parsing token stream: {:?}", path);

        if !path.exists() {
            return Err(ReportError::TokenParseError {
                line: 0,
                message: format!("Token stream not found: {:?}", path),
            });
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        Ok(JsonlSampleIterator {
            lines: reader.lines(),
            line_number: 0,
        })
    }
}

/// Iterator over token samples from a JSONL file
pub struct JsonlSampleIterator {
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl Iterator for JsonlSampleIterator {
    type Item = Result<TokenSample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ReportError::IoError(e))),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<TokenSample>(&line) {
                Ok(sample) => return Some(Ok(sample)),
                Err(e) => {
                    return Some(Err(ReportError::TokenParseError {
                        line: self.line_number,
                        message: e.to_string(),
                    }))
                }
            }
        }
    }
}
