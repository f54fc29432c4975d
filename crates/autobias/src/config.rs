//! Configuration types for a bias audit.
//!
//! The caller-selected parts of an audit (target, sensitive columns, output
//! handling) live in [`AuditConfig`]. The decision thresholds are fixed
//! policy constants and deliberately not part of the configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Policy constants
// =============================================================================

/// A target with at most this many distinct values is a classification target.
pub const CLASSIFICATION_CARDINALITY_LIMIT: usize = 10;

/// A category share strictly below this flags representation bias.
pub const UNDER_REPRESENTATION_THRESHOLD: f64 = 0.2;

/// Sensitive columns with more distinct values than this are excluded from
/// group-based scoring and mitigation.
pub const HIGH_CARDINALITY_LIMIT: usize = 10;

/// Lower winsorization percentile for regression mitigation.
pub const WINSORIZE_LOWER: f64 = 0.10;

/// Upper winsorization percentile for regression mitigation.
pub const WINSORIZE_UPPER: f64 = 0.90;

/// Fraction of the gap to the overall mean that each group is pulled by.
pub const GROUP_MEAN_PULL: f64 = 0.6;

/// Score improvements below this mark the remaining bias as structural.
pub const STRUCTURAL_BIAS_DELTA: f64 = 0.05;

/// Absolute skewness above this marks a distribution as skewed.
pub const SKEW_THRESHOLD: f64 = 1.0;

/// Imbalance ratio above which class imbalance is severe.
pub const HIGH_IMBALANCE_RATIO: f64 = 0.75;

/// Imbalance ratio above which class imbalance is moderate.
pub const MODERATE_IMBALANCE_RATIO: f64 = 0.6;

/// Column-name fragments that hint at a prediction target.
pub const TARGET_SUGGESTION_KEYWORDS: [&str; 6] =
    ["income", "status", "result", "label", "target", "outcome"];

/// Seed used for resampling when none is configured.
pub const DEFAULT_RESAMPLE_SEED: u64 = 42;

// =============================================================================
// Audit configuration
// =============================================================================

/// Configuration for a bias audit.
///
/// Use [`AuditConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use autobias::config::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .target_column("income")
///     .sensitive_column("gender")
///     .sensitive_column("race")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Target column. `None` (or a name not in the dataset) means the
    /// dataset is audited in exploratory mode.
    /// Default: None
    #[serde(default)]
    pub target_column: Option<String>,

    /// Columns treated as protected attributes. Each one is scored
    /// independently.
    /// Default: empty
    #[serde(default)]
    pub sensitive_columns: Vec<String>,

    /// Whether to deduplicate and impute before analysis.
    /// Default: true
    #[serde(default = "default_true")]
    pub preprocess: bool,

    /// Seed for the class-rebalancing resampler.
    /// Default: 42
    #[serde(default = "default_seed")]
    pub resample_seed: u64,

    /// Output directory for reports and mitigated datasets.
    /// Default: "output"
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Whether the CLI writes mitigated data and reports to disk.
    /// Default: true
    #[serde(default = "default_true")]
    pub save_to_disk: bool,
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    DEFAULT_RESAMPLE_SEED
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            target_column: None,
            sensitive_columns: Vec::new(),
            preprocess: true,
            resample_seed: DEFAULT_RESAMPLE_SEED,
            output_dir: default_output_dir(),
            save_to_disk: true,
        }
    }
}

impl AuditConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(target) = &self.target_column
            && target.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyColumnName);
        }

        for (idx, col) in self.sensitive_columns.iter().enumerate() {
            if col.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName);
            }
            if self.sensitive_columns[..idx].contains(col) {
                return Err(ConfigValidationError::DuplicateSensitiveColumn(col.clone()));
            }
            if self.target_column.as_deref() == Some(col.as_str()) {
                return Err(ConfigValidationError::TargetIsSensitive(col.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Column names must not be empty")]
    EmptyColumnName,

    #[error("Sensitive column '{0}' is listed more than once")]
    DuplicateSensitiveColumn(String),

    #[error("Column '{0}' cannot be both the target and a sensitive attribute")]
    TargetIsSensitive(String),
}

/// Builder for [`AuditConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    target_column: Option<String>,
    sensitive_columns: Vec<String>,
    preprocess: Option<bool>,
    resample_seed: Option<u64>,
    output_dir: Option<PathBuf>,
    save_to_disk: Option<bool>,
}

impl AuditConfigBuilder {
    /// Set the target column.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Add one sensitive column.
    pub fn sensitive_column(mut self, column: impl Into<String>) -> Self {
        self.sensitive_columns.push(column.into());
        self
    }

    /// Add several sensitive columns.
    pub fn sensitive_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Enable or disable deduplication and imputation before analysis.
    pub fn preprocess(mut self, enable: bool) -> Self {
        self.preprocess = Some(enable);
        self
    }

    /// Set the resampling seed used by class rebalancing.
    pub fn resample_seed(mut self, seed: u64) -> Self {
        self.resample_seed = Some(seed);
        self
    }

    /// Set the output directory for reports and mitigated data.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enable or disable writing outputs to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AuditConfig` or an error if validation fails.
    pub fn build(self) -> Result<AuditConfig, ConfigValidationError> {
        let config = AuditConfig {
            target_column: self.target_column,
            sensitive_columns: self.sensitive_columns,
            preprocess: self.preprocess.unwrap_or(true),
            resample_seed: self.resample_seed.unwrap_or(DEFAULT_RESAMPLE_SEED),
            output_dir: self.output_dir.unwrap_or_else(default_output_dir),
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
