use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Dataset kind
// ============================================================================

/// Which analysis branch a dataset goes through.
///
/// Derived from the target column by
/// [`DatasetClassifier::classify`](crate::profiler::DatasetClassifier::classify),
/// never stored on the dataset itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// No usable target column.
    Exploratory,
    /// Categorical or low-cardinality target.
    Classification,
    /// Numeric, high-cardinality target.
    Regression,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploratory => "exploratory",
            Self::Classification => "classification",
            Self::Regression => "regression",
        }
    }

    /// Whether a mitigation transform exists for this kind.
    pub fn supports_mitigation(&self) -> bool {
        !matches!(self, Self::Exploratory)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Distributions
// ============================================================================

/// One category of a normalized value-frequency distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub value: String,
    pub count: usize,
    pub proportion: f64,
}

/// Normalized value frequencies of a column, ordered by count descending
/// (ties keep first-seen order). Nulls are not counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDistribution {
    pub shares: Vec<CategoryShare>,
}

impl ValueDistribution {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Number of distinct non-null values.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Number of non-null values the distribution was built from.
    pub fn total(&self) -> usize {
        self.shares.iter().map(|s| s.count).sum()
    }

    /// The most frequent value. Ties go to the smallest value, so
    /// `"false"` wins over `"true"` and `"a"` over `"b"`.
    pub fn mode(&self) -> Option<&str> {
        let top = self.shares.first()?.count;
        self.shares
            .iter()
            .take_while(|s| s.count == top)
            .map(|s| s.value.as_str())
            .min()
    }

    pub fn max_proportion(&self) -> Option<f64> {
        self.shares.iter().map(|s| s.proportion).reduce(f64::max)
    }

    pub fn min_proportion(&self) -> Option<f64> {
        self.shares.iter().map(|s| s.proportion).reduce(f64::min)
    }

    pub fn proportion_of(&self, value: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.value == value)
            .map(|s| s.proportion)
    }
}

/// Value distribution of one sensitive column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDistribution {
    pub column: String,
    pub distribution: ValueDistribution,
}

// ============================================================================
// Bias result bundles
// ============================================================================

/// A numeric column whose absolute skewness exceeds the skew threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewedFeature {
    pub column: String,
    pub skewness: f64,
}

/// Raw statistics of an exploratory (target-less) audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExploratoryBias {
    pub representation_bias: Vec<ColumnDistribution>,
    pub skewed_features: Vec<SkewedFeature>,
    /// Sensitive columns that could not be analysed.
    pub skipped_columns: Vec<String>,
}

/// Severity of class imbalance in a classification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImbalanceSeverity {
    Low,
    Moderate,
    High,
}

/// Raw statistics of a classification audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationBias {
    pub target: String,
    pub class_distribution: ValueDistribution,
    /// Largest class proportion (0.0 for an all-null target).
    pub imbalance_ratio: f64,
    pub imbalance_severity: ImbalanceSeverity,
    pub representation_bias: Vec<ColumnDistribution>,
    pub skipped_columns: Vec<String>,
}

/// Mean target value of one group of a sensitive column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

/// Per-sensitive-column statistics of a regression audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub column: String,
    /// Group means ordered by group key.
    pub group_means: Vec<GroupMean>,
    /// Distinct non-null values in the sensitive column.
    pub cardinality: usize,
    /// Pearson correlation between the target and the column's category
    /// codes; `None` when undefined.
    pub correlation: Option<f64>,
}

impl GroupOutcome {
    /// Spread between the highest and lowest group mean.
    pub fn mean_spread(&self) -> Option<f64> {
        let max = self.group_means.iter().map(|g| g.mean).reduce(f64::max)?;
        let min = self.group_means.iter().map(|g| g.mean).reduce(f64::min)?;
        Some(max - min)
    }

    /// Unweighted mean of the group means.
    pub fn mean_of_means(&self) -> Option<f64> {
        if self.group_means.is_empty() {
            return None;
        }
        let sum: f64 = self.group_means.iter().map(|g| g.mean).sum();
        Some(sum / self.group_means.len() as f64)
    }
}

/// Raw statistics of a regression audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionBias {
    pub target: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// `None` when fewer than three target values are present.
    pub skewness: Option<f64>,
    pub group_outcomes: Vec<GroupOutcome>,
    pub skipped_columns: Vec<String>,
}

/// The result bundle handed from a detector to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BiasBundle {
    Exploratory(ExploratoryBias),
    Classification(ClassificationBias),
    Regression(RegressionBias),
}

impl BiasBundle {
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Exploratory(_) => DatasetKind::Exploratory,
            Self::Classification(_) => DatasetKind::Classification,
            Self::Regression(_) => DatasetKind::Regression,
        }
    }

    pub fn skipped_columns(&self) -> &[String] {
        match self {
            Self::Exploratory(b) => &b.skipped_columns,
            Self::Classification(b) => &b.skipped_columns,
            Self::Regression(b) => &b.skipped_columns,
        }
    }
}

// ============================================================================
// Scores
// ============================================================================

/// Three-tier interpretation of a bias score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// `< 0.3` Low, `< 0.6` Moderate, otherwise High.
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Self::Low
        } else if score < 0.6 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Bias Risk",
            Self::Moderate => "Moderate Bias Risk",
            Self::High => "High Bias Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score, label and reasons for one bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAssessment {
    /// Saturating sum of contributions, always within `[0, 1]`.
    pub score: f64,
    pub risk: RiskLevel,
    /// One reason per contribution, in the order they were added.
    pub reasons: Vec<String>,
}

impl BiasAssessment {
    pub fn label(&self) -> &'static str {
        self.risk.label()
    }
}

// ============================================================================
// Mitigation summary
// ============================================================================

/// How a mitigation run changed the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationVerdict {
    /// The baseline score was already zero.
    NoBiasDetected,
    /// The score dropped by less than the structural-bias delta.
    Structural,
    /// The score dropped by at least the structural-bias delta.
    Reduced,
}

impl MitigationVerdict {
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoBiasDetected => "No bias detected; nothing to mitigate",
            Self::Structural => {
                "Remaining bias is structural and not reducible by data-level mitigation"
            }
            Self::Reduced => "Bias reduced by mitigation",
        }
    }
}

/// Serializable before/after view of a mitigation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationSummary {
    pub kind: DatasetKind,
    pub rows_before: usize,
    pub rows_after: usize,
    pub before: BiasAssessment,
    pub after: BiasAssessment,
    /// `before.score - after.score`.
    pub improvement: f64,
    pub verdict: MitigationVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distribution(pairs: &[(&str, usize)]) -> ValueDistribution {
        let total: usize = pairs.iter().map(|(_, c)| c).sum();
        ValueDistribution {
            shares: pairs
                .iter()
                .map(|(v, c)| CategoryShare {
                    value: v.to_string(),
                    count: *c,
                    proportion: *c as f64 / total as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.59), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(RiskLevel::Low.label(), "Low Bias Risk");
        assert_eq!(RiskLevel::Moderate.to_string(), "Moderate Bias Risk");
        assert_eq!(RiskLevel::High.label(), "High Bias Risk");
    }

    #[test]
    fn test_distribution_accessors() {
        let dist = distribution(&[("X", 9), ("Y", 1)]);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.total(), 10);
        assert_eq!(dist.mode(), Some("X"));
        assert_eq!(dist.max_proportion(), Some(0.9));
        assert_eq!(dist.min_proportion(), Some(0.1));
        assert_eq!(dist.proportion_of("Y"), Some(0.1));
        assert_eq!(dist.proportion_of("Z"), None);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = ValueDistribution::default();
        assert!(dist.is_empty());
        assert_eq!(dist.mode(), None);
        assert_eq!(dist.min_proportion(), None);
    }

    #[test]
    fn test_mode_tie_takes_smallest_value() {
        let dist = distribution(&[("b", 2), ("a", 2), ("c", 1)]);
        assert_eq!(dist.mode(), Some("a"));
    }

    #[test]
    fn test_group_outcome_spread() {
        let outcome = GroupOutcome {
            column: "sex".to_string(),
            group_means: vec![
                GroupMean { group: "F".to_string(), mean: 40.0, count: 5 },
                GroupMean { group: "M".to_string(), mean: 60.0, count: 5 },
            ],
            cardinality: 2,
            correlation: Some(0.5),
        };
        assert_eq!(outcome.mean_spread(), Some(20.0));
        assert_eq!(outcome.mean_of_means(), Some(50.0));
    }

    #[test]
    fn test_bundle_serializes_with_kind_tag() {
        let bundle = BiasBundle::Exploratory(ExploratoryBias::default());
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["kind"], "exploratory");
        assert_eq!(bundle.kind(), DatasetKind::Exploratory);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DatasetKind::Regression.to_string(), "regression");
        assert!(!DatasetKind::Exploratory.supports_mitigation());
        assert!(DatasetKind::Classification.supports_mitigation());
    }
}
