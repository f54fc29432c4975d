//! Target winsorization plus a partial pull of group means toward the
//! overall mean.

use crate::config::{GROUP_MEAN_PULL, HIGH_CARDINALITY_LIMIT, WINSORIZE_LOWER, WINSORIZE_UPPER};
use crate::detection::target_values;
use crate::error::{Result, ResultExt};
use crate::profiler::statistics::{group_means, mean, quantile, sorted_categories};
use crate::utils::{column_series, float_series, string_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Reduce outcome disparity in a regression dataset.
///
/// 1. The target is clipped to its 10th and 90th percentiles.
/// 2. The overall mean of the clipped target is taken once.
/// 3. For each sensitive column with at most ten distinct values, in the
///    order given, every row's target moves by
///    `0.6 * (overall_mean - group_mean)`, with group means computed on the
///    values as adjusted by the previous columns.
///
/// Rows with a null target or a null group key keep their value. Only the
/// target column changes; it comes back as `Float64`.
pub fn mitigate_regression(
    df: &DataFrame,
    target: &str,
    sensitive_columns: &[String],
) -> Result<DataFrame> {
    let mut values = target_values(df, target).context("During regression mitigation")?;

    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if let (Some(lower), Some(upper)) = (
        quantile(&present, WINSORIZE_LOWER),
        quantile(&present, WINSORIZE_UPPER),
    ) {
        debug!("Clipping '{}' to [{:.4}, {:.4}]", target, lower, upper);
        for value in values.iter_mut().flatten() {
            *value = value.clamp(lower, upper);
        }
    }

    let clipped: Vec<f64> = values.iter().flatten().copied().collect();
    if let Some(overall_mean) = mean(&clipped) {
        for col in sensitive_columns {
            if let Err(e) = pull_toward_mean(df, col, &mut values, overall_mean) {
                warn!("Skipping sensitive column '{}': {}", col, e);
            }
        }
    }

    let mut mitigated = df.clone();
    mitigated.replace(target, float_series(target.into(), values))?;
    info!(
        "Mitigated regression target '{}' over {} sensitive column(s)",
        target,
        sensitive_columns.len()
    );

    Ok(mitigated)
}

fn pull_toward_mean(
    df: &DataFrame,
    col: &str,
    values: &mut [Option<f64>],
    overall_mean: f64,
) -> Result<()> {
    let series = column_series(df, col)?;
    let order = sorted_categories(series)?;
    if order.len() > HIGH_CARDINALITY_LIMIT {
        debug!(
            "'{}' has {} groups; leaving it out of mitigation",
            col,
            order.len()
        );
        return Ok(());
    }

    let keys = string_values(series)?;
    let means: HashMap<String, f64> = group_means(&keys, values, &order)
        .into_iter()
        .map(|g| (g.group, g.mean))
        .collect();

    for (value, key) in values.iter_mut().zip(&keys) {
        if let (Some(value), Some(key)) = (value.as_mut(), key)
            && let Some(group_mean) = means.get(key)
        {
            *value += GROUP_MEAN_PULL * (overall_mean - group_mean);
        }
    }

    Ok(())
}
