//! Class rebalancing by oversampling minority classes with replacement.

use crate::error::{Result, ResultExt};
use crate::profiler::statistics::value_frequencies;
use crate::utils::{column_series, string_values};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info};

/// Rebalance a classification dataset so every class has as many rows as
/// the largest one.
///
/// Classes are emitted in value-count order. The largest class keeps its
/// rows unchanged; every smaller class is replaced by `max_count` rows
/// drawn from it with replacement, each class seeded with `seed`. Rows
/// with a null target are dropped.
///
/// `sensitive_columns` is accepted for signature parity with regression
/// mitigation and is not used.
pub fn mitigate_classification(
    df: &DataFrame,
    target: &str,
    _sensitive_columns: &[String],
    seed: u64,
) -> Result<DataFrame> {
    let series = column_series(df, target).context("During class rebalancing")?;
    let keys = string_values(series)?;
    let distribution = value_frequencies(keys.iter().cloned());

    let Some(max_count) = distribution.shares.first().map(|s| s.count) else {
        debug!("Target '{}' has no values; nothing to rebalance", target);
        return Ok(df.slice(0, 0));
    };

    let mut rows_by_class: HashMap<&str, Vec<IdxSize>> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            rows_by_class
                .entry(key.as_str())
                .or_default()
                .push(row as IdxSize);
        }
    }

    let mut indices: Vec<IdxSize> = Vec::with_capacity(max_count * distribution.len());
    for share in &distribution.shares {
        let Some(rows) = rows_by_class.get(share.value.as_str()) else {
            continue;
        };

        if rows.len() < max_count {
            let mut rng = StdRng::seed_from_u64(seed);
            indices.extend((0..max_count).map(|_| rows[rng.gen_range(0..rows.len())]));
            debug!(
                "Oversampled class '{}' from {} to {} rows",
                share.value,
                rows.len(),
                max_count
            );
        } else {
            indices.extend_from_slice(rows);
        }
    }

    let balanced = df.take(&IdxCa::from_vec("idx".into(), indices))?;
    info!(
        "Rebalanced {} classes: {} -> {} rows",
        distribution.len(),
        df.height(),
        balanced.height()
    );

    Ok(balanced)
}
