//! Integration tests for the bias audit.
//!
//! These tests verify end-to-end behavior of audits and mitigation using
//! small CSV datasets.

use autobias::profiler::statistics::{quantile, series_distribution};
use autobias::{
    AuditConfig, BiasAuditor, BiasBundle, BiasError, DatasetClassifier, DatasetKind,
    MitigationVerdict, ReportGenerator, RiskLevel, load_csv,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    load_csv(fixtures_path().join(filename)).expect("Failed to read CSV fixture")
}

fn auditor(target: Option<&str>, sensitive: &[&str]) -> BiasAuditor {
    let mut builder = AuditConfig::builder().sensitive_columns(sensitive.iter().copied());
    if let Some(target) = target {
        builder = builder.target_column(target);
    }
    BiasAuditor::builder()
        .config(builder.build().expect("valid config"))
        .build()
        .expect("valid auditor")
}

fn float_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

fn class_counts(df: &DataFrame, name: &str) -> Vec<usize> {
    series_distribution(df.column(name).unwrap().as_materialized_series())
        .unwrap()
        .shares
        .into_iter()
        .map(|s| s.count)
        .collect()
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_classification_eighty_twenty_is_high_risk() {
    let df = load_fixture("loan_approvals.csv");
    let session = auditor(Some("label"), &["sex"]).audit(&df).unwrap();

    assert_eq!(session.kind, DatasetKind::Classification);
    assert_eq!(session.shape_before, (11, 4));
    assert_eq!(session.data.height(), 10, "duplicate row should be removed");

    let BiasBundle::Classification(ref bias) = session.bundle else {
        panic!("expected a classification bundle");
    };
    assert_eq!(bias.imbalance_ratio, 0.8);

    assert!(session.assessment.score >= 0.6);
    assert_eq!(session.assessment.risk, RiskLevel::High);
    assert_eq!(session.assessment.label(), "High Bias Risk");
    assert_eq!(session.assessment.reasons, vec!["Severe class imbalance"]);
}

#[test]
fn test_exploratory_representation_flag() {
    let df = load_fixture("survey_groups.csv");
    let session = auditor(None, &["group"]).audit(&df).unwrap();

    assert_eq!(session.kind, DatasetKind::Exploratory);
    assert!(session.assessment.score >= 0.3);
    assert_eq!(
        session.assessment.reasons,
        vec!["Under-representation detected in group"]
    );
}

#[test]
fn test_regression_high_cardinality_column_contributes_nothing() {
    let df = load_fixture("house_prices.csv");
    let session = auditor(Some("price"), &["city"]).audit(&df).unwrap();

    assert_eq!(session.kind, DatasetKind::Regression);

    let BiasBundle::Regression(ref bias) = session.bundle else {
        panic!("expected a regression bundle");
    };
    assert_eq!(bias.group_outcomes[0].cardinality, 15);

    assert_eq!(session.assessment.score, 0.0);
    assert!(session.assessment.reasons.is_empty());
}

#[test]
fn test_regression_disparity_and_correlation() {
    let df = load_fixture("salaries.csv");
    let session = auditor(Some("salary"), &["sex"]).audit(&df).unwrap();

    assert_eq!(session.kind, DatasetKind::Regression);
    assert!((session.assessment.score - 0.7).abs() < 1e-9);
    assert_eq!(
        session.assessment.reasons,
        vec![
            "Outcome disparity across groups in sex",
            "Strong correlation with sensitive attribute sex",
        ]
    );
}

#[test]
fn test_preprocessing_actions_recorded() {
    let df = load_fixture("loan_approvals.csv");
    let session = auditor(Some("label"), &[]).audit(&df).unwrap();

    let actions = &session.preprocessing_actions;
    assert!(actions.iter().any(|a| a.starts_with("Removed 1 duplicate rows")));
    assert!(
        actions
            .iter()
            .any(|a| a == "Filled 1 missing values in 'age' with median: 38.00")
    );
}

// ============================================================================
// Mitigation
// ============================================================================

#[test]
fn test_class_rebalancing_equalizes_counts() {
    let df = load_fixture("loan_approvals.csv");
    let auditor = auditor(Some("label"), &["sex"]);
    let session = auditor.audit(&df).unwrap();

    let outcome = auditor.mitigate(&session).unwrap();

    assert_eq!(class_counts(&outcome.data, "label"), vec![8, 8]);
    assert_eq!(outcome.summary.rows_before, 10);
    assert_eq!(outcome.summary.rows_after, 16);
    assert!(outcome.summary.after.score < outcome.summary.before.score);
    assert_eq!(outcome.summary.verdict, MitigationVerdict::Reduced);

    // the session dataset is untouched
    assert_eq!(class_counts(&session.data, "label"), vec![8, 2]);
}

#[test]
fn test_regression_mitigation_reduces_disparity() {
    let df = load_fixture("salaries.csv");
    let auditor = auditor(Some("salary"), &["sex"]);
    let session = auditor.audit(&df).unwrap();

    let outcome = auditor.mitigate(&session).unwrap();

    assert!((outcome.summary.after.score - 0.3).abs() < 1e-9);
    assert_eq!(
        outcome.summary.after.reasons,
        vec!["Strong correlation with sensitive attribute sex"]
    );
    assert!((outcome.summary.improvement - 0.4).abs() < 1e-9);
    assert_eq!(outcome.summary.verdict, MitigationVerdict::Reduced);
}

#[test]
fn test_regression_clipping_bounds() {
    let df = load_fixture("salaries.csv");
    let before = float_column(&df, "salary");
    let lower = quantile(&before, 0.10).unwrap();
    let upper = quantile(&before, 0.90).unwrap();

    let auditor = auditor(Some("salary"), &[]);
    let session = auditor.audit(&df).unwrap();
    let outcome = auditor.mitigate(&session).unwrap();

    for value in float_column(&outcome.data, "salary") {
        assert!(
            (lower..=upper).contains(&value),
            "{value} outside [{lower}, {upper}]"
        );
    }
}

#[test]
fn test_high_cardinality_groups_only_clipped() {
    let df = load_fixture("house_prices.csv");

    let with_city = auditor(Some("price"), &["city"]);
    let without = auditor(Some("price"), &[]);

    let a = with_city.mitigate(&with_city.audit(&df).unwrap()).unwrap();
    let b = without.mitigate(&without.audit(&df).unwrap()).unwrap();

    assert_eq!(float_column(&a.data, "price"), float_column(&b.data, "price"));
    assert_eq!(a.summary.verdict, MitigationVerdict::NoBiasDetected);
}

#[test]
fn test_structural_bias_verdict() {
    let df = load_fixture("balanced_labels.csv");
    let auditor = auditor(Some("label"), &["sex"]);
    let session = auditor.audit(&df).unwrap();

    assert_eq!(session.assessment.reasons, vec!["Representation bias in sex"]);

    let outcome = auditor.mitigate(&session).unwrap();
    assert_eq!(outcome.summary.rows_after, 10);
    assert_eq!(outcome.summary.after, outcome.summary.before);
    assert_eq!(outcome.summary.verdict, MitigationVerdict::Structural);
}

#[test]
fn test_exploratory_mitigation_is_rejected() {
    let df = load_fixture("survey_groups.csv");
    let auditor = auditor(None, &["group"]);
    let session = auditor.audit(&df).unwrap();

    let err = auditor.mitigate(&session).unwrap_err();
    assert!(matches!(
        err,
        BiasError::MitigationUnsupported(DatasetKind::Exploratory)
    ));
    assert!(err.is_recoverable());
}

#[test]
fn test_seeded_rebalancing_is_reproducible() {
    let df = load_fixture("loan_approvals.csv");
    let auditor = auditor(Some("label"), &["sex"]);
    let session = auditor.audit(&df).unwrap();

    let first = auditor.mitigate(&session).unwrap();
    let second = auditor.mitigate(&session).unwrap();
    assert!(first.data.equals(&second.data));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_missing_sensitive_column_is_skipped() {
    let df = load_fixture("survey_groups.csv");
    let session = auditor(None, &["group", "region"]).audit(&df).unwrap();

    assert_eq!(session.bundle.skipped_columns(), &["region".to_string()]);
    assert_eq!(session.assessment.score, 0.3);
}

#[test]
fn test_invalid_config_rejected() {
    let err = AuditConfig::builder()
        .target_column("label")
        .sensitive_column("label")
        .build()
        .unwrap_err();

    let err: BiasError = err.into();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

// ============================================================================
// Target Suggestions
// ============================================================================

#[test]
fn test_target_suggestions_rank_keyword_columns_first() {
    let df = load_fixture("loan_approvals.csv");
    let suggestions = DatasetClassifier::suggest_targets(&df).unwrap();

    assert_eq!(suggestions.first().map(String::as_str), Some("label"));
}

// ============================================================================
// Concurrency and Reporting
// ============================================================================

#[test]
fn test_auditor_shared_across_threads() {
    let auditor = Arc::new(auditor(Some("label"), &["sex"]));

    let handles: Vec<_> = ["loan_approvals.csv", "balanced_labels.csv"]
        .into_iter()
        .map(|name| {
            let auditor = Arc::clone(&auditor);
            thread::spawn(move || auditor.audit(&load_fixture(name)).unwrap().assessment)
        })
        .collect();

    let scores: Vec<f64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().score)
        .collect();
    assert_eq!(scores, vec![0.6, 0.3]);
}

#[test]
fn test_report_roundtrip_through_disk() {
    let df = load_fixture("salaries.csv");
    let auditor = auditor(Some("salary"), &["sex"]);
    let session = auditor.audit(&df).unwrap();
    let mut outcome = auditor.mitigate(&session).unwrap();

    let dir = std::env::temp_dir().join(format!("autobias_it_{}", std::process::id()));
    let generator = ReportGenerator::new(&dir);

    let csv_path = generator.write_dataset(&mut outcome.data, "salaries").unwrap();
    let report = ReportGenerator::build_report(
        "salaries.csv",
        csv_path.to_str(),
        &session,
        Some(&outcome),
    );
    let report_path = generator.write_report_to_file(&report, "salaries").unwrap();

    assert!(csv_path.ends_with("salaries_mitigated.csv"));
    assert!(report_path.ends_with("salaries_report.json"));

    let reloaded = load_csv(&csv_path).unwrap();
    assert_eq!(reloaded.shape(), outcome.data.shape());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["kind"], "regression");
    assert_eq!(json["mitigation"]["verdict"], "reduced");

    let _ = std::fs::remove_dir_all(&dir);
}
