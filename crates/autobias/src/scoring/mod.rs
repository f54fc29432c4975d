//! Bias scoring: turning a result bundle into a bounded score with reasons.
//!
//! Scores are additive. Each contribution comes with exactly one reason,
//! contributions are never subtracted, and the total saturates at 1.0.

use crate::config::{HIGH_CARDINALITY_LIMIT, SKEW_THRESHOLD, UNDER_REPRESENTATION_THRESHOLD};
use crate::types::{
    BiasAssessment, BiasBundle, ClassificationBias, ColumnDistribution, ExploratoryBias,
    GroupOutcome, ImbalanceSeverity, RegressionBias, RiskLevel,
};

const UNDER_REPRESENTATION_WEIGHT: f64 = 0.3;
const SKEWED_FEATURES_WEIGHT: f64 = 0.3;
const HIGH_IMBALANCE_WEIGHT: f64 = 0.6;
const MODERATE_IMBALANCE_WEIGHT: f64 = 0.4;
const SKEWED_TARGET_WEIGHT: f64 = 0.3;
const OUTCOME_DISPARITY_WEIGHT: f64 = 0.4;
const CORRELATION_WEIGHT: f64 = 0.3;

/// Group-mean spread above this fraction of the mean of group means is a
/// disparity.
const DISPARITY_FRACTION: f64 = 0.3;

/// Absolute correlation above this is a strong correlation.
const CORRELATION_THRESHOLD: f64 = 0.3;

/// Saturating sum of weighted contributions.
#[derive(Debug, Default)]
struct ScoreAccumulator {
    total: f64,
    reasons: Vec<String>,
}

impl ScoreAccumulator {
    fn add(&mut self, weight: f64, reason: impl Into<String>) {
        self.total += weight;
        self.reasons.push(reason.into());
    }

    fn finish(self) -> (f64, Vec<String>) {
        (self.total.min(1.0), self.reasons)
    }
}

/// Scores result bundles.
pub struct BiasScorer;

impl BiasScorer {
    /// Score any bundle and attach its risk label.
    pub fn score(bundle: &BiasBundle) -> BiasAssessment {
        let (score, reasons) = match bundle {
            BiasBundle::Exploratory(b) => score_exploratory(b),
            BiasBundle::Classification(b) => score_classification(b),
            BiasBundle::Regression(b) => score_regression(b),
        };

        BiasAssessment {
            score,
            risk: interpret_bias_score(score),
            reasons,
        }
    }
}

/// Map a score to its three-tier risk level.
pub fn interpret_bias_score(score: f64) -> RiskLevel {
    RiskLevel::from_score(score)
}

fn is_under_represented(dist: &ColumnDistribution) -> bool {
    dist.distribution
        .min_proportion()
        .is_some_and(|min| min < UNDER_REPRESENTATION_THRESHOLD)
}

fn is_low_cardinality(outcome: &GroupOutcome) -> bool {
    outcome.cardinality <= HIGH_CARDINALITY_LIMIT
}

/// +0.3 per under-represented sensitive column, +0.3 once if any numeric
/// feature is skewed.
pub fn score_exploratory(results: &ExploratoryBias) -> (f64, Vec<String>) {
    let mut acc = ScoreAccumulator::default();

    for dist in results.representation_bias.iter().filter(|d| is_under_represented(d)) {
        acc.add(
            UNDER_REPRESENTATION_WEIGHT,
            format!("Under-representation detected in {}", dist.column),
        );
    }

    if !results.skewed_features.is_empty() {
        acc.add(
            SKEWED_FEATURES_WEIGHT,
            "Highly skewed numerical features present",
        );
    }

    acc.finish()
}

/// +0.6 for severe or +0.4 for moderate class imbalance, +0.3 per
/// under-represented sensitive column.
pub fn score_classification(results: &ClassificationBias) -> (f64, Vec<String>) {
    let mut acc = ScoreAccumulator::default();

    match results.imbalance_severity {
        ImbalanceSeverity::High => acc.add(HIGH_IMBALANCE_WEIGHT, "Severe class imbalance"),
        ImbalanceSeverity::Moderate => {
            acc.add(MODERATE_IMBALANCE_WEIGHT, "Moderate class imbalance")
        }
        ImbalanceSeverity::Low => {}
    }

    for dist in results.representation_bias.iter().filter(|d| is_under_represented(d)) {
        acc.add(
            UNDER_REPRESENTATION_WEIGHT,
            format!("Representation bias in {}", dist.column),
        );
    }

    acc.finish()
}

/// +0.3 for a skewed target; for each low-cardinality sensitive column,
/// +0.4 for an outcome disparity and +0.3 for a strong correlation.
///
/// All disparity reasons come before all correlation reasons.
pub fn score_regression(results: &RegressionBias) -> (f64, Vec<String>) {
    let mut acc = ScoreAccumulator::default();

    if results
        .skewness
        .is_some_and(|skew| skew.abs() > SKEW_THRESHOLD)
    {
        acc.add(SKEWED_TARGET_WEIGHT, "Highly skewed target variable");
    }

    let low_cardinality: Vec<&GroupOutcome> = results
        .group_outcomes
        .iter()
        .filter(|o| is_low_cardinality(o))
        .collect();

    for outcome in &low_cardinality {
        if let (Some(spread), Some(mean_of_means)) = (outcome.mean_spread(), outcome.mean_of_means())
            && spread > mean_of_means * DISPARITY_FRACTION
        {
            acc.add(
                OUTCOME_DISPARITY_WEIGHT,
                format!("Outcome disparity across groups in {}", outcome.column),
            );
        }
    }

    for outcome in &low_cardinality {
        if outcome
            .correlation
            .is_some_and(|corr| corr.abs() > CORRELATION_THRESHOLD)
        {
            acc.add(
                CORRELATION_WEIGHT,
                format!(
                    "Strong correlation with sensitive attribute {}",
                    outcome.column
                ),
            );
        }
    }

    acc.finish()
}
