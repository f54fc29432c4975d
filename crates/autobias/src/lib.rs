//! Bias Audit Library
//!
//! Bias detection, scoring and data-level mitigation for tabular datasets,
//! built on Polars.
//!
//! # Overview
//!
//! An audit takes a dataset, an optional target column and a list of
//! sensitive (protected-attribute) columns, and runs:
//!
//! - **Preprocessing**: Exact-duplicate removal and median/mode imputation
//! - **Classification**: Exploratory, classification or regression, derived from the target
//! - **Detection**: Representation, class imbalance, skew and group-outcome statistics
//! - **Scoring**: A bounded score in `[0, 1]` with one reason per contribution
//! - **Mitigation**: Class rebalancing, or winsorization with a group-mean pull
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use autobias::{AuditConfig, BiasAuditor, load_csv};
//!
//! let df = load_csv("data/adult.csv")?;
//!
//! let config = AuditConfig::builder()
//!     .target_column("income")
//!     .sensitive_columns(["sex", "race"])
//!     .build()?;
//!
//! let auditor = BiasAuditor::builder().config(config).build()?;
//! let session = auditor.audit(&df)?;
//!
//! println!("Bias score: {:.2} ({})", session.assessment.score, session.assessment.label());
//! for reason in &session.assessment.reasons {
//!     println!("  - {}", reason);
//! }
//!
//! let outcome = auditor.mitigate(&session)?;
//! println!("After mitigation: {:.2}", outcome.summary.after.score);
//! ```
//!
//! # Choosing a target
//!
//! [`DatasetClassifier::suggest_targets`] ranks columns by how likely they
//! are to be the prediction target:
//!
//! ```rust,ignore
//! use autobias::DatasetClassifier;
//!
//! for name in DatasetClassifier::suggest_targets(&df)? {
//!     println!("{}", name);
//! }
//! ```

pub mod audit;
pub mod cleaner;
pub mod config;
pub mod detection;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod mitigation;
pub mod profiler;
pub mod reporting;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use audit::{AuditSession, BiasAuditor, BiasAuditorBuilder, MitigationOutcome, mitigation_verdict};
pub use cleaner::Preprocessor;
pub use config::{AuditConfig, AuditConfigBuilder, ConfigValidationError};
pub use detection::{BiasDetector, classification_bias, exploratory_bias, regression_bias};
pub use error::{BiasError, Result as BiasResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::load_csv;
pub use mitigation::{Mitigator, mitigate_classification, mitigate_regression};
pub use profiler::{DatasetClassifier, TargetSuggestion};
pub use reporting::{AuditReport, DatasetShape, ReportGenerator};
pub use scoring::{BiasScorer, interpret_bias_score};
pub use types::{
    BiasAssessment, BiasBundle, ClassificationBias, DatasetKind, ExploratoryBias,
    ImbalanceSeverity, MitigationSummary, MitigationVerdict, RegressionBias, RiskLevel,
};
