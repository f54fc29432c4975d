//! CLI entry point for the bias audit.

use anyhow::{Result, anyhow};
use autobias::{
    AuditConfig, AuditReport, AuditSession, BiasAuditor, BiasError, DatasetClassifier,
    MitigationOutcome, ReportGenerator, load_csv,
};
use clap::Parser;
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Bias detection and mitigation for tabular datasets",
    long_about = "Audits a CSV dataset for representation bias, class imbalance and \
                  group outcome disparities, and optionally mitigates them.\n\n\
                  EXAMPLES:\n  \
                  # Exploratory audit of two protected attributes\n  \
                  autobias -i data.csv -s sex -s race\n\n  \
                  # Classification audit with mitigation\n  \
                  autobias -i adult.csv -t income -s sex --mitigate\n\n  \
                  # Which column looks like a target?\n  \
                  autobias -i data.csv --suggest-targets\n\n  \
                  # Machine-readable output\n  \
                  autobias -i data.csv -t price -s region --json"
)]
struct Args {
    /// Path to the CSV file to audit
    #[arg(short, long)]
    input: String,

    /// Target column
    ///
    /// Without a target (or with one not in the file) the audit is exploratory
    #[arg(short, long)]
    target: Option<String>,

    /// Sensitive column; repeat or comma-separate for several
    #[arg(short, long = "sensitive", value_delimiter = ',')]
    sensitive: Vec<String>,

    /// Mitigate the detected bias and compare scores
    #[arg(long)]
    mitigate: bool,

    /// Skip duplicate removal and imputation
    #[arg(long)]
    no_preprocess: bool,

    /// Seed for class rebalancing
    #[arg(long, default_value_t = autobias::config::DEFAULT_RESAMPLE_SEED)]
    seed: u64,

    /// Output directory for the mitigated dataset and report [default: output]
    #[arg(short, long)]
    output: Option<String>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Print ranked target-column suggestions and exit
    #[arg(long)]
    suggest_targets: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    if args.suggest_targets {
        return print_target_suggestions(&data, args.json);
    }

    let auditor = BiasAuditor::builder().config(build_config(&args)?).build()?;
    let session = auditor.audit(&data)?;

    let mut outcome = if args.mitigate {
        run_mitigation(&auditor, &session)?
    } else {
        None
    };

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(&auditor.config().output_dir);

    let output_file = match outcome.as_mut() {
        Some(outcome) if auditor.config().save_to_disk => {
            let path = generator.write_dataset(&mut outcome.data, &input_stem)?;
            Some(path.display().to_string())
        }
        _ => None,
    };

    let report = ReportGenerator::build_report(
        &args.input,
        output_file.as_deref(),
        &session,
        outcome.as_ref(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Translate CLI flags into an audit config; unset flags keep the config defaults.
fn build_config(args: &Args) -> Result<AuditConfig> {
    let mut config_builder = AuditConfig::builder()
        .sensitive_columns(args.sensitive.iter().cloned())
        .preprocess(!args.no_preprocess)
        .resample_seed(args.seed);

    if let Some(ref output) = args.output {
        config_builder = config_builder.output_dir(output);
    }

    if let Some(ref target) = args.target {
        config_builder = config_builder.target_column(target);
    }

    Ok(config_builder.build()?)
}

/// Mitigate, treating an exploratory dataset as "nothing to do".
fn run_mitigation(
    auditor: &BiasAuditor,
    session: &AuditSession,
) -> Result<Option<MitigationOutcome>> {
    match auditor.mitigate(session) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(e @ BiasError::MitigationUnsupported(_)) => {
            warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_target_suggestions(data: &DataFrame, json: bool) -> Result<()> {
    let suggestions = DatasetClassifier::ranked_targets(data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No target candidates found");
        return Ok(());
    }

    println!("Suggested target columns:");
    for (rank, suggestion) in suggestions.iter().enumerate() {
        println!(
            "  {}. {} (score {})",
            rank + 1,
            suggestion.column,
            suggestion.score
        );
    }
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the audit.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &AuditReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("BIAS AUDIT COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, report.shape_before.rows, report.shape_before.columns
    );
    if let Some(ref output_file) = report.output_file {
        println!("Output: {}", output_file);
    }
    println!();

    println!("Dataset Type: {}", report.kind);
    if let Some(ref target) = report.target_column {
        println!("Target Column: {}", target);
    }
    if !report.sensitive_columns.is_empty() {
        println!("Sensitive Columns: {}", report.sensitive_columns.join(", "));
    }
    println!();

    if !report.preprocessing_actions.is_empty() {
        println!("Preprocessing:");
        for action in report.preprocessing_actions.iter().take(5) {
            println!("  - {}", action);
        }
        if report.preprocessing_actions.len() > 5 {
            println!(
                "  ... and {} more actions",
                report.preprocessing_actions.len() - 5
            );
        }
        println!();
    }

    let assessment = &report.assessment;
    println!(
        "Bias Score: {:.2} ({})",
        assessment.score,
        assessment.label()
    );
    if assessment.reasons.is_empty() {
        println!("  No bias indicators found");
    }
    for reason in &assessment.reasons {
        println!("  - {}", reason);
    }
    println!();

    let skipped = report.bias.skipped_columns();
    if !skipped.is_empty() {
        println!("Skipped Columns:");
        for col in skipped {
            println!("  ! {}", col);
        }
        println!();
    }

    if let Some(ref mitigation) = report.mitigation {
        println!("Mitigation:");
        println!(
            "  Rows: {} -> {}",
            mitigation.rows_before, mitigation.rows_after
        );
        println!(
            "  Score: {:.2} ({}) -> {:.2} ({})",
            mitigation.before.score,
            mitigation.before.label(),
            mitigation.after.score,
            mitigation.after.label()
        );
        println!("  Improvement: {:.2}", mitigation.improvement);
        println!("  {}", mitigation.verdict.description());
        for reason in &mitigation.after.reasons {
            println!("  - remaining: {}", reason);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
