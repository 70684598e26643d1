//! Row derivation engine
//!
//! Turns raw token samples into finished table rows: class lookup against
//! the database, minimum-distance computation, hazard rule application, and
//! cycle numbering.

use crate::classes::ClassDatabase;
use crate::config::ReportConfig;
use crate::types::{CycleId, TokenRecord, TokenSample, UNKNOWN_CLASS};

/// Sequential row deriver
///
/// Rows must be fed in stream order: positions are assigned from 1 and the
/// cycle label depends on the rows already seen. Major cycles advance at
/// explicit `cycle_break` markers; a kernel contact closes the current
/// sub-cycle, so the following row starts the next minor.
pub struct RowDeriver<'a> {
    db: &'a ClassDatabase,
    config: &'a ReportConfig,
    next_position: u32,
    cycle: CycleId,
    contact_pending: bool,
}

impl<'a> RowDeriver<'a> {
    pub fn new(db: &'a ClassDatabase, config: &'a ReportConfig) -> Self {
        Self {
            db,
            config,
            next_position: 1,
            cycle: CycleId::initial(),
            contact_pending: false,
        }
    }

    /// Derive the next table row from a token sample
    pub fn derive(&mut self, sample: TokenSample) -> TokenRecord {
        if sample.cycle_break && self.next_position > 1 {
            self.cycle = self.cycle.next_major();
            self.contact_pending = false;
        } else if self.contact_pending {
            self.cycle = self.cycle.next_minor();
            self.contact_pending = false;
        }

        let definition = self.db.lookup(&sample.token);
        let class = definition
            .map(|d| d.class.clone())
            .unwrap_or_else(|| UNKNOWN_CLASS.to_string());

        // Hazard rules only apply to known tokens
        let hazard_class = definition
            .and_then(|d| d.hazard.as_ref())
            .filter(|rule| sample.h_dist <= rule.max_h_dist)
            .map(|rule| rule.tag.clone());

        let min_dist = sample.k_dist.min(sample.h_dist).min(sample.e_dist);

        let record = TokenRecord {
            position: self.next_position,
            token: sample.token,
            class,
            k_dist: sample.k_dist,
            h_dist: sample.h_dist,
            e_dist: sample.e_dist,
            min_dist,
            hazard_adj: hazard_class.is_some(),
            hazard_class,
            cycle: self.cycle,
            notes: sample.note.unwrap_or_default(),
        };

        if record.is_kernel_contact(self.config.contact_threshold) {
            self.contact_pending = true;
        }
        self.next_position += 1;

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::{ClassDefinition, HazardRule, MatchRule};

    fn sample(token: &str, k: u32, h: u32, e: u32) -> TokenSample {
        TokenSample {
            token: token.to_string(),
            k_dist: k,
            h_dist: h,
            e_dist: e,
            note: None,
            cycle_break: false,
        }
    }

    fn test_db() -> ClassDatabase {
        let mut db = ClassDatabase::new();
        db.add_definition(ClassDefinition {
            class: "KER".to_string(),
            match_rule: MatchRule::Prefix("k_".to_string()),
            hazard: None,
            source: "test.toml".to_string(),
        });
        db.add_definition(ClassDefinition {
            class: "HZD".to_string(),
            match_rule: MatchRule::Prefix("haz_".to_string()),
            hazard: Some(HazardRule {
                tag: "H-EDGE".to_string(),
                max_h_dist: 1,
            }),
            source: "test.toml".to_string(),
        });
        db
    }

    #[test]
    fn test_class_lookup_and_min_dist() {
        let db = test_db();
        let config = ReportConfig::default();
        let mut deriver = RowDeriver::new(&db, &config);

        let rec = deriver.derive(sample("k_gate", 3, 5, 2));
        assert_eq!(rec.position, 1);
        assert_eq!(rec.class, "KER");
        assert_eq!(rec.min_dist, 2);
        assert!(!rec.hazard_adj);

        let rec = deriver.derive(sample("mystery", 1, 1, 1));
        assert_eq!(rec.position, 2);
        assert_eq!(rec.class, UNKNOWN_CLASS);
    }

    #[test]
    fn test_hazard_rule_fires_at_or_below_limit() {
        let db = test_db();
        let config = ReportConfig::default();
        let mut deriver = RowDeriver::new(&db, &config);

        let close = deriver.derive(sample("haz_wall", 5, 1, 6));
        assert!(close.hazard_adj);
        assert_eq!(close.hazard_class.as_deref(), Some("H-EDGE"));

        let far = deriver.derive(sample("haz_wall", 5, 2, 6));
        assert!(!far.hazard_adj);
        assert_eq!(far.hazard_class, None);
    }

    #[test]
    fn test_contact_closes_sub_cycle() {
        let db = test_db();
        let config = ReportConfig::default();
        let mut deriver = RowDeriver::new(&db, &config);

        let first = deriver.derive(sample("step", 3, 4, 5)); // 1.1
        let contact = deriver.derive(sample("k_gate", 1, 4, 5)); // 1.1, contact
        let after = deriver.derive(sample("step", 3, 4, 5)); // 1.2

        assert_eq!(first.cycle, CycleId { major: 1, minor: 1 });
        assert_eq!(contact.cycle, CycleId { major: 1, minor: 1 });
        assert_eq!(after.cycle, CycleId { major: 1, minor: 2 });
    }

    #[test]
    fn test_cycle_break_starts_new_major() {
        let db = test_db();
        let config = ReportConfig::default();
        let mut deriver = RowDeriver::new(&db, &config);

        let mut breaking = sample("step", 1, 4, 5);
        breaking.cycle_break = true;
        // A break on the very first sample is a no-op
        let first = deriver.derive(breaking.clone());
        assert_eq!(first.cycle, CycleId { major: 1, minor: 1 });

        // Contact on row 1 would bump minor, but the break takes precedence
        let second = deriver.derive(breaking);
        assert_eq!(second.cycle, CycleId { major: 2, minor: 1 });
    }
}
