//! Class definition file parser
//!
//! Parses TOML class definition files and converts them into database
//! definitions. A file holds an array of `[[class]]` tables:
//!
//! ```toml
//! [[class]]
//! name = "KER"
//! tokens = ["kernel_enter", "kernel_probe"]
//! prefixes = ["k_"]
//!
//! [class.hazard]
//! tag = "H-KER"
//! max_h_dist = 1
//! ```

use crate::classes::database::{ClassDefinition, HazardRule, MatchRule};
use crate::types::{ReportError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ClassFile {
    #[serde(default)]
    class: Vec<ClassEntry>,
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    name: String,
    #[serde(default)]
    tokens: Vec<String>,
    #[serde(default)]
    prefixes: Vec<String>,
    hazard: Option<HazardEntry>,
}

#[derive(Debug, Deserialize)]
struct HazardEntry {
    tag: String,
    max_h_dist: u32,
}

/// Parse a class definition file and return database definitions
pub fn parse_class_file(path: &Path) -> Result<Vec<ClassDefinition>> {
    log::info!("Parsing class file: {:?}", path);

    let content = std::fs::read_to_string(path).map_err(|e| {
        ReportError::ClassParseError(format!("Failed to read file {:?}: {}", path, e))
    })?;

    let file: ClassFile = toml::from_str(&content).map_err(|e| {
        ReportError::ClassParseError(format!("Failed to parse class file {:?}: {}", path, e))
    })?;

    let source_filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.toml")
        .to_string();

    let mut definitions = Vec::new();

    for entry in &file.class {
        if entry.tokens.is_empty() && entry.prefixes.is_empty() {
            return Err(ReportError::ClassParseError(format!(
                "Class '{}' in {:?} has no tokens or prefixes",
                entry.name, path
            )));
        }

        let hazard = entry.hazard.as_ref().map(|h| HazardRule {
            tag: h.tag.clone(),
            max_h_dist: h.max_h_dist,
        });

        for token in &entry.tokens {
            definitions.push(ClassDefinition {
                class: entry.name.clone(),
                match_rule: MatchRule::Exact(token.clone()),
                hazard: hazard.clone(),
                source: source_filename.clone(),
            });
        }
        for prefix in &entry.prefixes {
            definitions.push(ClassDefinition {
                class: entry.name.clone(),
                match_rule: MatchRule::Prefix(prefix.clone()),
                hazard: hazard.clone(),
                source: source_filename.clone(),
            });
        }
    }

    log::info!(
        "Parsed {} class entries ({} classes) from {:?}",
        definitions.len(),
        file.class.len(),
        path
    );

    Ok(definitions)
}
