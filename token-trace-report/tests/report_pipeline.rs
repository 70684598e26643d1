//! End-to-end pipeline test: class file + token stream on disk, through
//! build, render, re-parse, and validation.

use std::fs;
use std::path::PathBuf;

use token_trace_report::{
    has_errors, render_markdown, validate, ReportConfig, ReportParser, TraceBuilder,
};

const CLASSES: &str = r#"
[[class]]
name = "KER"
tokens = ["kernel_probe"]
prefixes = ["k_"]

[[class]]
name = "HZD"
prefixes = ["haz_"]

[class.hazard]
tag = "H-EDGE"
max_h_dist = 1

[[class]]
name = "NAV"
prefixes = ["nav_"]
"#;

const TOKENS: &str = r#"
{"token": "nav_enter", "k_dist": 4, "h_dist": 6, "e_dist": 5}
{"token": "nav_step", "k_dist": 3, "h_dist": 5, "e_dist": 5}
{"token": "haz_ledge", "k_dist": 2, "h_dist": 1, "e_dist": 6, "note": "close pass"}
{"token": "k_gate", "k_dist": 1, "h_dist": 2, "e_dist": 6}
{"token": "nav_retreat", "k_dist": 5, "h_dist": 4, "e_dist": 2, "cycle_break": true}
{"token": "unmapped_blip", "k_dist": 6, "h_dist": 6, "e_dist": 6}
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    class_path: PathBuf,
    token_path: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let class_path = dir.path().join("navigation.toml");
    let token_path = dir.path().join("trace.jsonl");
    fs::write(&class_path, CLASSES).unwrap();
    fs::write(&token_path, TOKENS).unwrap();
    Fixture {
        _dir: dir,
        class_path,
        token_path,
    }
}

#[test]
fn build_render_parse_validate() {
    let fixture = fixture();
    let config = ReportConfig::default();

    let mut builder = TraceBuilder::new();
    builder.add_classes(&fixture.class_path).unwrap();
    let stats = builder.database_stats();
    assert_eq!(stats.num_classes, 3);
    assert_eq!(stats.num_hazard_rules, 1);

    let report = builder.build_file(&fixture.token_path, &config).unwrap();
    assert_eq!(report.len(), 6);

    // Row derivation: classes, hazard flag, cycle numbering
    let hazard_row = &report.records[2];
    assert_eq!(hazard_row.class, "HZD");
    assert!(hazard_row.hazard_adj);
    assert_eq!(hazard_row.hazard_class.as_deref(), Some("H-EDGE"));
    assert_eq!(hazard_row.min_dist, 1);
    assert_eq!(hazard_row.notes, "close pass");

    let unknown_row = &report.records[5];
    assert_eq!(unknown_row.class, "UNKNOWN");
    assert!(!unknown_row.hazard_adj);

    // The contact at row 3 closes sub-cycle 1.1; the break at row 5 opens 2.1
    assert_eq!(report.records[2].cycle.to_string(), "1.1");
    assert_eq!(report.records[3].cycle.to_string(), "1.2");
    assert_eq!(report.records[4].cycle.to_string(), "2.1");

    // Summary: rows 3 and 4 touch the kernel, rows 1-4 descend into a contact
    assert_eq!(report.summary.kernel_contacts, 2);
    assert_eq!(report.summary.hazard_transitions, 1);
    assert_eq!(report.summary.navigation_sequences.len(), 1);
    let sequence = report.summary.navigation_sequences[0];
    assert_eq!((sequence.start, sequence.end), (1, 4));

    // Rendered output carries the canonical layout
    let text = render_markdown(&report, &config);
    assert!(text.contains("| 0003 | haz_ledge"));
    assert!(text.contains("- Kernel contacts (Min_Dist <= 1): 2"));
    assert!(text.contains("- 0001-0004"));

    // Parsing the rendered text restores the same rows and summary
    let parsed = ReportParser::parse_str(&text).unwrap();
    assert_eq!(parsed.records, report.records);
    assert_eq!(parsed.summary, report.summary);

    // A freshly built report validates clean
    let issues = validate(&parsed, &config);
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[test]
fn tampered_report_fails_validation() {
    let fixture = fixture();
    let config = ReportConfig::default();

    let mut builder = TraceBuilder::new();
    builder.add_classes(&fixture.class_path).unwrap();
    let report = builder.build_file(&fixture.token_path, &config).unwrap();
    let text = render_markdown(&report, &config);

    // Forge the kernel gate's K_Dist without touching Min_Dist or the summary
    let tampered: String = text
        .lines()
        .map(|line| {
            if line.contains("k_gate") {
                line.replacen("| 1 ", "| 9 ", 1)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    assert_ne!(tampered, text, "tamper target not found in rendered report");

    let parsed = ReportParser::parse_str(&tampered).unwrap();
    let issues = validate(&parsed, &config);
    assert!(has_errors(&issues));
    assert!(issues.iter().any(|i| i.message.contains("Min_Dist")));
}
