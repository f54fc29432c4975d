//! Classification bias: class imbalance and sensitive-group representation.

use super::representation_bias;
use crate::config::{HIGH_IMBALANCE_RATIO, MODERATE_IMBALANCE_RATIO};
use crate::error::{Result, ResultExt};
use crate::profiler::statistics::series_distribution;
use crate::types::{ClassificationBias, ImbalanceSeverity};
use crate::utils::column_series;
use polars::prelude::*;
use tracing::debug;

/// Map an imbalance ratio to a severity. Both bounds are strict.
pub fn imbalance_severity(imbalance_ratio: f64) -> ImbalanceSeverity {
    if imbalance_ratio > HIGH_IMBALANCE_RATIO {
        ImbalanceSeverity::High
    } else if imbalance_ratio > MODERATE_IMBALANCE_RATIO {
        ImbalanceSeverity::Moderate
    } else {
        ImbalanceSeverity::Low
    }
}

/// Detect bias in a dataset with a categorical target.
pub fn classification_bias(
    df: &DataFrame,
    target: &str,
    sensitive_columns: &[String],
) -> Result<ClassificationBias> {
    let target_series = column_series(df, target).context("During classification detection")?;
    let class_distribution = series_distribution(target_series)?;

    let imbalance_ratio = class_distribution.max_proportion().unwrap_or(0.0);
    let imbalance_severity = imbalance_severity(imbalance_ratio);
    debug!(
        "Target '{}': {} classes, imbalance ratio {:.3} ({:?})",
        target,
        class_distribution.len(),
        imbalance_ratio,
        imbalance_severity
    );

    let (representation_bias, skipped_columns) = representation_bias(df, sensitive_columns);

    Ok(ClassificationBias {
        target: target.to_string(),
        class_distribution,
        imbalance_ratio,
        imbalance_severity,
        representation_bias,
        skipped_columns,
    })
}
