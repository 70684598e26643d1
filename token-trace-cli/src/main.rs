//! Token Trace CLI Application
//!
//! This is the command-line interface for the token-trace report toolkit.
//! It uses the token-trace-report library and adds:
//! - Input discovery and TOML application config
//! - Parallel multi-file processing
//! - Output writing (markdown/JSON)
//! - Report checking (parse + validate existing reports)

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

mod config;
mod output;

/// Token Trace Reader - Build and check token-trace reports
#[derive(Parser, Debug)]
#[command(name = "token-trace-cli")]
#[command(about = "Build and check token-level trace reports", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a JSONL token stream to build a report from
    #[arg(short, long, value_name = "FILE")]
    tokens: Option<PathBuf>,

    /// Path to class definition file(s) (can be repeated)
    #[arg(long, value_name = "FILE")]
    classes: Vec<PathBuf>,

    /// Path to an existing report to parse and validate
    #[arg(long, value_name = "FILE")]
    check: Option<PathBuf>,

    /// Output file for the rendered report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml) - for multi-file processing
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of token samples to process (for testing)
    #[arg(long, value_name = "COUNT")]
    max_rows: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Token Trace CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using report library v{}", token_trace_report::VERSION);

    if let Some(report_path) = &args.check {
        // Check mode - parse and validate an existing report
        check_mode(report_path)?;
    } else if args.tokens.is_some() {
        // Simple build mode - one token stream, report to stdout or a file
        simple_build_mode(&args)?;
    } else if let Some(config_path) = &args.config {
        // Config mode - multi-file processing
        config_mode(config_path)?;
    } else {
        // No arguments - show help
        println!("Token Trace Reader - No input specified");
        println!("\nQuick Start:");
        println!("  token-trace-cli --tokens trace.jsonl --classes navigation.toml");
        println!("  token-trace-cli --check trace_report.md");
        println!("\nFor multi-file processing:");
        println!("  token-trace-cli --config config.toml");
        println!("\nUse --help for more options");
    }

    Ok(())
}

/// Simple build mode - load classes, build one report, write it out
fn simple_build_mode(args: &Args) -> Result<()> {
    use std::io::{self, Write};
    use token_trace_report::{JsonlParser, ReportConfig, TraceBuilder};

    let token_path = args.tokens.as_ref().expect("checked by caller");
    let report_config = ReportConfig::default();

    let mut builder = TraceBuilder::new();
    for class_path in &args.classes {
        print!("Loading classes: {:?} ... ", class_path);
        io::stdout().flush()?;
        match builder.add_classes(class_path) {
            Ok(_) => println!("ok"),
            Err(e) => {
                println!("failed");
                eprintln!("Error loading class file: {}", e);
                return Err(e.into());
            }
        }
    }

    let stats = builder.database_stats();
    println!("Class database:");
    println!("  Classes:      {}", stats.num_classes);
    println!("  Entries:      {}", stats.num_entries);
    println!("  Hazard rules: {}", stats.num_hazard_rules);

    log::info!("Building report from {:?}", token_path);
    let samples = JsonlParser::parse(token_path)?
        .collect::<token_trace_report::Result<Vec<_>>>()?;
    let samples = match args.max_rows {
        Some(limit) => samples.into_iter().take(limit).collect(),
        None => samples,
    };
    let report = builder.build_from_samples(samples, &report_config);

    println!(
        "Built report: {} rows, {} kernel contacts, {} navigation sequences",
        report.len(),
        report.summary.kernel_contacts,
        report.summary.navigation_sequences.len()
    );

    let text = token_trace_report::render_markdown(&report, &report_config);
    match &args.output {
        Some(path) => {
            use anyhow::Context;
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            println!("Report written to {:?}", path);
        }
        None => println!("\n{}", text),
    }

    Ok(())
}

/// Check mode - parse an existing report and validate it
fn check_mode(report_path: &Path) -> Result<()> {
    use token_trace_report::{has_errors, validate, ReportConfig, ReportParser};

    println!("Checking report: {:?}", report_path);

    let report = ReportParser::parse(report_path)?;
    println!("Parsed {} rows", report.len());

    let issues = validate(&report, &ReportConfig::default());
    if issues.is_empty() {
        println!("Report is consistent");
        return Ok(());
    }

    println!("{} issue(s) found:", issues.len());
    output::print_issues(&issues);

    if has_errors(&issues) {
        anyhow::bail!("report failed validation");
    }
    Ok(())
}

/// Config mode - build reports for every configured token stream
fn config_mode(config_path: &Path) -> Result<()> {
    use rayon::prelude::*;
    use token_trace_report::TraceBuilder;

    log::info!("Loading configuration from: {:?}", config_path);
    let app_config = config::load_config(config_path)?;
    let report_config = app_config.analysis.to_report_config();

    let mut builder = TraceBuilder::new();
    for class_path in &app_config.input.class_files {
        builder.add_classes(class_path)?;
    }
    let stats = builder.database_stats();
    log::info!(
        "Class database loaded: {} classes, {} entries",
        stats.num_classes,
        stats.num_entries
    );

    let results: Vec<Result<PathBuf>> = app_config
        .input
        .token_files
        .par_iter()
        .map(|token_path| {
            let report = builder.build_file(token_path, &report_config)?;
            let path = output::output_path(
                token_path,
                app_config.output.output_dir.as_deref(),
                app_config.output.format,
            );
            output::write_report(&report, &report_config, app_config.output.format, &path)?;
            Ok(path)
        })
        .collect();

    let mut failures = 0;
    for (token_path, result) in app_config.input.token_files.iter().zip(&results) {
        match result {
            Ok(path) => println!("{:?} -> {:?}", token_path, path),
            Err(e) => {
                failures += 1;
                eprintln!("Failed to process {:?}: {}", token_path, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} inputs failed", failures, results.len());
    }
    println!("Processed {} token stream(s)", results.len());
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
