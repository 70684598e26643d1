//! Unified class database
//!
//! Combines class definitions from multiple definition files into a single
//! queryable database used for per-row token lookup.

use std::collections::HashMap;

/// How a class definition matches tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Token must equal this string exactly
    Exact(String),
    /// Token must start with this prefix
    Prefix(String),
}

/// Hazard classification rule attached to a class
///
/// Fires when a matched row's hazard distance is at or below the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardRule {
    /// Hazard classification tag for the report's Hazard_Class column
    pub tag: String,
    /// Maximum hazard distance at which the rule fires
    pub max_h_dist: u32,
}

/// A single class definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    /// Class tag for the report's Class column
    pub class: String,
    /// Token match rule
    pub match_rule: MatchRule,
    /// Hazard rule (None if this class never flags rows)
    pub hazard: Option<HazardRule>,
    /// Source file (definition filename)
    pub source: String,
}

/// The unified class database
///
/// Lookup precedence: exact entries win over prefix entries, longer prefixes
/// win over shorter ones, and on equal precedence the first definition
/// loaded wins.
pub struct ClassDatabase {
    /// Exact-match entries by token
    exact: HashMap<String, ClassDefinition>,

    /// Prefix entries, kept sorted by descending prefix length
    prefixes: Vec<ClassDefinition>,
}

impl ClassDatabase {
    /// Create a new empty class database
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            prefixes: Vec::new(),
        }
    }

    /// Add a class definition to the database
    ///
    /// A later definition for the same token or prefix is ignored
    /// (first-loaded wins).
    pub fn add_definition(&mut self, definition: ClassDefinition) {
        match &definition.match_rule {
            MatchRule::Exact(token) => {
                if self.exact.contains_key(token) {
                    log::warn!(
                        "Ignoring duplicate class entry for token '{}' from {}",
                        token,
                        definition.source
                    );
                    return;
                }
                self.exact.insert(token.clone(), definition);
            }
            MatchRule::Prefix(prefix) => {
                if self
                    .prefixes
                    .iter()
                    .any(|d| matches!(&d.match_rule, MatchRule::Prefix(p) if p == prefix))
                {
                    log::warn!(
                        "Ignoring duplicate class prefix '{}' from {}",
                        prefix,
                        definition.source
                    );
                    return;
                }
                let prefix_len = prefix.len();
                // Stable insertion keeps first-loaded ahead of equal-length peers
                let idx = self
                    .prefixes
                    .partition_point(|d| match &d.match_rule {
                        MatchRule::Prefix(p) => p.len() >= prefix_len,
                        MatchRule::Exact(_) => true,
                    });
                self.prefixes.insert(idx, definition);
            }
        }
    }

    /// Look up the class definition for a token
    pub fn lookup(&self, token: &str) -> Option<&ClassDefinition> {
        if let Some(definition) = self.exact.get(token) {
            return Some(definition);
        }
        self.prefixes.iter().find(|d| match &d.match_rule {
            MatchRule::Prefix(prefix) => token.starts_with(prefix.as_str()),
            MatchRule::Exact(_) => false,
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> DatabaseStats {
        let num_entries = self.exact.len() + self.prefixes.len();
        let mut classes: Vec<&str> = self
            .exact
            .values()
            .chain(self.prefixes.iter())
            .map(|d| d.class.as_str())
            .collect();
        classes.sort_unstable();
        classes.dedup();
        let num_hazard_rules = self
            .exact
            .values()
            .chain(self.prefixes.iter())
            .filter(|d| d.hazard.is_some())
            .count();

        DatabaseStats {
            num_classes: classes.len(),
            num_entries,
            num_hazard_rules,
        }
    }
}

impl Default for ClassDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of distinct class tags
    pub num_classes: usize,
    /// Total number of match entries
    pub num_entries: usize,
    /// Number of entries carrying a hazard rule
    pub num_hazard_rules: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(class: &str, rule: MatchRule) -> ClassDefinition {
        ClassDefinition {
            class: class.to_string(),
            match_rule: rule,
            hazard: None,
            source: "test.toml".to_string(),
        }
    }

    #[test]
    fn test_empty_database() {
        let db = ClassDatabase::new();
        let stats = db.stats();
        assert_eq!(stats.num_classes, 0);
        assert_eq!(stats.num_entries, 0);
        assert_eq!(stats.num_hazard_rules, 0);
        assert!(db.lookup("anything").is_none());
    }

    #[test]
    fn test_exact_beats_prefix() {
        let mut db = ClassDatabase::new();
        db.add_definition(definition("NAV", MatchRule::Prefix("nav_".to_string())));
        db.add_definition(definition("NAV_ROOT", MatchRule::Exact("nav_root".to_string())));

        assert_eq!(db.lookup("nav_root").unwrap().class, "NAV_ROOT");
        assert_eq!(db.lookup("nav_step").unwrap().class, "NAV");
    }

    #[test]
    fn test_longer_prefix_wins() {
        let mut db = ClassDatabase::new();
        db.add_definition(definition("NAV", MatchRule::Prefix("nav_".to_string())));
        db.add_definition(definition("NAV_K", MatchRule::Prefix("nav_k".to_string())));

        assert_eq!(db.lookup("nav_kernel").unwrap().class, "NAV_K");
        assert_eq!(db.lookup("nav_edge").unwrap().class, "NAV");
    }

    #[test]
    fn test_first_loaded_wins_on_duplicate() {
        let mut db = ClassDatabase::new();
        db.add_definition(definition("FIRST", MatchRule::Exact("tok".to_string())));
        db.add_definition(definition("SECOND", MatchRule::Exact("tok".to_string())));

        assert_eq!(db.lookup("tok").unwrap().class, "FIRST");
        assert_eq!(db.stats().num_entries, 1);
    }

    #[test]
    fn test_stats_counts_distinct_classes_and_hazards() {
        let mut db = ClassDatabase::new();
        db.add_definition(definition("KER", MatchRule::Exact("kernel".to_string())));
        db.add_definition(definition("KER", MatchRule::Prefix("k_".to_string())));
        let mut hazardous = definition("HZD", MatchRule::Prefix("haz_".to_string()));
        hazardous.hazard = Some(HazardRule {
            tag: "H-EDGE".to_string(),
            max_h_dist: 1,
        });
        db.add_definition(hazardous);

        let stats = db.stats();
        assert_eq!(stats.num_classes, 2);
        assert_eq!(stats.num_entries, 3);
        assert_eq!(stats.num_hazard_rules, 1);
    }
}
