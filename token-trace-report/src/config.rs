//! Report configuration types
//!
//! This module defines the minimal configuration the library needs. Anything
//! beyond thresholds and formatting (input discovery, output routing, etc.)
//! is handled by the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for building, rendering, and validating reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows with `min_dist` at or below this value count as kernel contacts
    #[serde(default = "default_contact_threshold")]
    pub contact_threshold: u32,

    /// Minimum number of rows for a navigation sequence
    #[serde(default = "default_min_navigation_len")]
    pub min_navigation_len: usize,

    /// Minimum width for zero-padded positions in rendered output
    #[serde(default = "default_position_width")]
    pub position_width: usize,
}

fn default_contact_threshold() -> u32 {
    1
}

fn default_min_navigation_len() -> usize {
    3
}

fn default_position_width() -> usize {
    4
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            contact_threshold: default_contact_threshold(),
            min_navigation_len: default_min_navigation_len(),
            position_width: default_position_width(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the kernel contact threshold
    pub fn with_contact_threshold(mut self, threshold: u32) -> Self {
        self.contact_threshold = threshold;
        self
    }

    /// Builder method: set the minimum navigation sequence length
    pub fn with_min_navigation_len(mut self, len: usize) -> Self {
        self.min_navigation_len = len;
        self
    }

    /// Builder method: set the zero-padded position width
    pub fn with_position_width(mut self, width: usize) -> Self {
        self.position_width = width;
        self
    }
}
