//! Audit orchestration.
//!
//! [`BiasAuditor`] runs the analysis stages in order:
//! preprocess → classify → detect → score. The result is an
//! [`AuditSession`], which carries the baseline assessment that a later
//! [`BiasAuditor::mitigate`] call compares against.

use crate::cleaner::Preprocessor;
use crate::config::{AuditConfig, STRUCTURAL_BIAS_DELTA};
use crate::detection::BiasDetector;
use crate::error::{BiasError, Result, ResultExt};
use crate::mitigation::Mitigator;
use crate::profiler::DatasetClassifier;
use crate::scoring::BiasScorer;
use crate::types::{
    BiasAssessment, BiasBundle, DatasetKind, MitigationSummary, MitigationVerdict,
};
use polars::prelude::*;
use std::time::Instant;
use tracing::{error, info};

/// Everything one audit run produced.
#[derive(Debug, Clone)]
pub struct AuditSession {
    /// The dataset the analysis ran on (after preprocessing, if enabled).
    pub data: DataFrame,
    /// `(rows, columns)` of the dataset as it was passed in.
    pub shape_before: (usize, usize),
    pub kind: DatasetKind,
    /// The target column, `None` for exploratory datasets.
    pub target: Option<String>,
    pub sensitive_columns: Vec<String>,
    pub bundle: BiasBundle,
    /// Baseline assessment for mitigation.
    pub assessment: BiasAssessment,
    pub preprocessing_actions: Vec<String>,
}

/// A mitigated dataset and how its score compares to the baseline.
#[derive(Debug, Clone)]
pub struct MitigationOutcome {
    pub data: DataFrame,
    /// Bundle detected on the mitigated dataset.
    pub bundle: BiasBundle,
    pub summary: MitigationSummary,
}

/// Runs bias audits with a fixed configuration.
///
/// # Example
///
/// ```rust,ignore
/// use autobias::{AuditConfig, BiasAuditor};
///
/// let config = AuditConfig::builder()
///     .target_column("income")
///     .sensitive_columns(["sex", "race"])
///     .build()?;
///
/// let auditor = BiasAuditor::builder().config(config).build()?;
/// let session = auditor.audit(&df)?;
/// println!("{:.2} {}", session.assessment.score, session.assessment.label());
///
/// let outcome = auditor.mitigate(&session)?;
/// println!("{}", outcome.summary.verdict.description());
/// ```
#[derive(Debug, Clone)]
pub struct BiasAuditor {
    config: AuditConfig,
    preprocessor: Preprocessor,
}

// Sessions are independent; one auditor may serve several threads.
static_assertions::assert_impl_all!(BiasAuditor: Send, Sync);

impl BiasAuditor {
    /// Create a new auditor builder.
    pub fn builder() -> BiasAuditorBuilder {
        BiasAuditorBuilder::default()
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Analyse a dataset and score it.
    ///
    /// # Errors
    ///
    /// [`BiasError::EmptyDataset`] for a dataset without rows or columns,
    /// [`BiasError::NonNumericTarget`] for a regression target that cannot
    /// be read as numbers, or any polars failure.
    pub fn audit(&self, df: &DataFrame) -> Result<AuditSession> {
        self.audit_internal(df).inspect_err(|e| error!("Audit error: {}", e))
    }

    fn audit_internal(&self, df: &DataFrame) -> Result<AuditSession> {
        let start_time = Instant::now();
        info!("Starting bias audit...");

        if df.height() == 0 || df.width() == 0 {
            return Err(BiasError::EmptyDataset);
        }
        let shape_before = df.shape();

        // Step 1: Preprocessing
        let (data, preprocessing_actions) = if self.config.preprocess {
            info!("Step 1: Preprocessing dataset...");
            self.preprocessor
                .preprocess(df)
                .context("Preprocessing failed")?
        } else {
            info!("Step 1: Skipping preprocessing (disabled)");
            (df.clone(), Vec::new())
        };

        // Step 2: Classification
        let kind = DatasetClassifier::classify(&data, self.config.target_column.as_deref())?;
        let target = match kind {
            DatasetKind::Exploratory => None,
            _ => self.config.target_column.clone(),
        };
        info!("Step 2: Dataset classified as {}", kind);

        // Step 3: Detection
        info!("Step 3: Detecting bias...");
        let bundle = BiasDetector::detect(
            &data,
            kind,
            target.as_deref(),
            &self.config.sensitive_columns,
        )?;

        // Step 4: Scoring
        let assessment = BiasScorer::score(&bundle);
        info!(
            "Step 4: Bias score {:.2} ({}) in {:.2?}",
            assessment.score,
            assessment.label(),
            start_time.elapsed()
        );

        Ok(AuditSession {
            data,
            shape_before,
            kind,
            target,
            sensitive_columns: self.config.sensitive_columns.clone(),
            bundle,
            assessment,
            preprocessing_actions,
        })
    }

    /// Mitigate the session's dataset and re-score it.
    ///
    /// # Errors
    ///
    /// [`BiasError::MitigationUnsupported`] for exploratory sessions.
    pub fn mitigate(&self, session: &AuditSession) -> Result<MitigationOutcome> {
        info!("Mitigating {} dataset...", session.kind);

        let data = Mitigator::mitigate(
            &session.data,
            session.kind,
            session.target.as_deref(),
            &session.sensitive_columns,
            self.config.resample_seed,
        )?;

        let bundle = BiasDetector::detect(
            &data,
            session.kind,
            session.target.as_deref(),
            &session.sensitive_columns,
        )
        .context("Re-detecting bias after mitigation")?;
        let after = BiasScorer::score(&bundle);

        let before = session.assessment.clone();
        let improvement = before.score - after.score;
        let verdict = mitigation_verdict(before.score, after.score);
        info!(
            "Bias score {:.2} -> {:.2}: {}",
            before.score,
            after.score,
            verdict.description()
        );

        let summary = MitigationSummary {
            kind: session.kind,
            rows_before: session.data.height(),
            rows_after: data.height(),
            before,
            after,
            improvement,
            verdict,
        };

        Ok(MitigationOutcome {
            data,
            bundle,
            summary,
        })
    }
}

/// Judge a mitigation run from the scores before and after it.
pub fn mitigation_verdict(before: f64, after: f64) -> MitigationVerdict {
    if before == 0.0 {
        MitigationVerdict::NoBiasDetected
    } else if before - after < STRUCTURAL_BIAS_DELTA {
        MitigationVerdict::Structural
    } else {
        MitigationVerdict::Reduced
    }
}

/// Builder for [`BiasAuditor`].
#[derive(Debug, Default)]
pub struct BiasAuditorBuilder {
    config: Option<AuditConfig>,
}

impl BiasAuditorBuilder {
    /// Set the audit configuration.
    pub fn config(mut self, config: AuditConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the auditor, validating the configuration.
    pub fn build(self) -> Result<BiasAuditor> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(BiasAuditor {
            config,
            preprocessor: Preprocessor,
        })
    }
}
