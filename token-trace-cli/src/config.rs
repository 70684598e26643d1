//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use token_trace_report::ReportConfig;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Token stream files, one report per file
    pub token_files: Vec<PathBuf>,
    /// Class definition files, shared by all reports
    #[serde(default)]
    pub class_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_contact_threshold")]
    pub contact_threshold: u32,
    #[serde(default = "default_min_navigation_len")]
    pub min_navigation_len: usize,
}

fn default_contact_threshold() -> u32 {
    1
}

fn default_min_navigation_len() -> usize {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            contact_threshold: default_contact_threshold(),
            min_navigation_len: default_min_navigation_len(),
        }
    }
}

impl AnalysisConfig {
    /// Convert to the library's report configuration
    pub fn to_report_config(&self) -> ReportConfig {
        ReportConfig::new()
            .with_contact_threshold(self.contact_threshold)
            .with_min_navigation_len(self.min_navigation_len)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.input.token_files.is_empty() {
        anyhow::bail!("Config {:?} lists no token files", path);
    }

    Ok(config)
}
