use crate::audit::{AuditSession, MitigationOutcome};
use crate::error::Result;
use crate::types::{BiasAssessment, BiasBundle, DatasetKind, MitigationSummary};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Full record of an audit run, and of its mitigation if one was done.
///
/// Used both for JSON output to stdout (`--json`) and for the report file
/// (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the mitigated dataset (if written)
    pub output_file: Option<String>,

    // Dataset
    pub shape_before: DatasetShape,
    /// Shape after preprocessing
    pub shape_after: DatasetShape,
    pub kind: DatasetKind,
    pub target_column: Option<String>,
    pub sensitive_columns: Vec<String>,
    pub preprocessing_actions: Vec<String>,

    // Analysis
    pub bias: BiasBundle,
    pub assessment: BiasAssessment,
    pub mitigation: Option<MitigationSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

impl From<(usize, usize)> for DatasetShape {
    fn from((rows, columns): (usize, usize)) -> Self {
        Self { rows, columns }
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes reports and mitigated datasets to an output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build a report from an audit session and an optional mitigation.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        session: &AuditSession,
        mitigation: Option<&MitigationOutcome>,
    ) -> AuditReport {
        AuditReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(str::to_string),
            shape_before: session.shape_before.into(),
            shape_after: session.data.shape().into(),
            kind: session.kind,
            target_column: session.target.clone(),
            sensitive_columns: session.sensitive_columns.clone(),
            preprocessing_actions: session.preprocessing_actions.clone(),
            bias: session.bundle.clone(),
            assessment: session.assessment.clone(),
            mitigation: mitigation.map(|m| m.summary.clone()),
        }
    }

    /// Write a report to `<base_name>_report.json` in the output directory.
    pub fn write_report_to_file(&self, report: &AuditReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write a dataset to `<base_name>_mitigated.csv` in the output directory.
    pub fn write_dataset(&self, df: &mut DataFrame, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}_mitigated.csv", base_name));
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)?;

        info!("Dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}
