//! Regression bias: target shape and per-group outcome differences.

use crate::error::{BiasError, Result, ResultExt};
use crate::profiler::statistics::{
    category_codes, group_means, mean, median, pearson, skewness, sorted_categories,
};
use crate::types::{GroupOutcome, RegressionBias};
use crate::utils::{column_series, is_text_dtype, numeric_values, string_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Read a regression target as optional floats, with NaN treated as missing.
pub(crate) fn target_values(df: &DataFrame, target: &str) -> Result<Vec<Option<f64>>> {
    let series = column_series(df, target)?;
    if is_text_dtype(series.dtype()) {
        return Err(BiasError::NonNumericTarget {
            column: target.to_string(),
            dtype: format!("{:?}", series.dtype()),
        });
    }

    Ok(numeric_values(series)?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Detect bias in a dataset with a numeric target.
pub fn regression_bias(
    df: &DataFrame,
    target: &str,
    sensitive_columns: &[String],
) -> Result<RegressionBias> {
    let values = target_values(df, target).context("During regression detection")?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();

    let mut group_outcomes = Vec::with_capacity(sensitive_columns.len());
    let mut skipped_columns = Vec::new();

    for col in sensitive_columns {
        match group_outcome(df, col, &values) {
            Ok(outcome) => {
                debug!(
                    "'{}': {} groups, correlation {:?}",
                    col, outcome.cardinality, outcome.correlation
                );
                group_outcomes.push(outcome);
            }
            Err(e) => {
                warn!("Skipping sensitive column '{}': {}", col, e);
                skipped_columns.push(col.clone());
            }
        }
    }

    Ok(RegressionBias {
        target: target.to_string(),
        mean: mean(&present),
        median: median(&present),
        skewness: skewness(&present),
        group_outcomes,
        skipped_columns,
    })
}

fn group_outcome(df: &DataFrame, col: &str, target: &[Option<f64>]) -> Result<GroupOutcome> {
    let series = column_series(df, col)?;
    let keys = string_values(series)?;
    let order = sorted_categories(series)?;

    // a degenerate correlation is recorded as None, never an error
    let correlation = match category_codes(series) {
        Ok(codes) => pearson(target, &codes),
        Err(e) => {
            debug!("No category codes for '{}': {}", col, e);
            None
        }
    };

    Ok(GroupOutcome {
        column: col.to_string(),
        group_means: group_means(&keys, target, &order),
        cardinality: order.len(),
        correlation,
    })
}
