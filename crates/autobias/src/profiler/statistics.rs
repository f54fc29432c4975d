//! Descriptive statistics used by the detectors and mitigators.
//!
//! All functions operate on non-null views of a column. Nulls are dropped by
//! the caller (see [`crate::utils`]) except where a function takes
//! `Option` values explicitly.

use crate::types::{CategoryShare, GroupMean, ValueDistribution};
use crate::utils::{is_numeric_dtype, numeric_values, string_values};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Normalized value frequencies, ordered by count descending with ties in
/// first-seen order. Nulls are ignored.
pub fn value_frequencies<I>(values: I) -> ValueDistribution
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values.into_iter().flatten() {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let shares = counts
        .into_iter()
        .map(|(value, count)| CategoryShare {
            value,
            count,
            proportion: count as f64 / total as f64,
        })
        .collect();

    ValueDistribution { shares }
}

/// Value distribution of a whole column.
pub fn series_distribution(series: &Series) -> PolarsResult<ValueDistribution> {
    Ok(value_frequencies(string_values(series)?))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between the two nearest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Adjusted Fisher-Pearson sample skewness.
///
/// Returns `None` for fewer than three values and `0.0` for a constant
/// sample.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let n_f = n as f64;
    let mean = mean(values)?;

    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_f;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n_f;

    if m2 <= f64::EPSILON * mean.abs().max(1.0) {
        return Some(0.0);
    }

    let g1 = m3 / m2.powf(1.5);
    let adjusted = g1 * (n_f * (n_f - 1.0)).sqrt() / (n_f - 2.0);
    adjusted.is_finite().then_some(adjusted)
}

/// Pearson correlation over the positions where both sides are present.
///
/// Returns `None` when it is undefined: fewer than two pairs, a constant
/// side, or a non-finite result.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Distinct non-null values of a column in sorted order: numeric order for
/// numeric columns, lexicographic otherwise.
pub fn sorted_categories(series: &Series) -> PolarsResult<Vec<String>> {
    let keys = string_values(series)?;

    if is_numeric_dtype(series.dtype()) {
        let numbers = numeric_values(series)?;
        let mut pairs: Vec<(f64, String)> = numbers
            .into_iter()
            .zip(keys)
            .filter_map(|(n, k)| Some((n?, k?)))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        pairs.dedup_by(|a, b| a.1 == b.1);
        return Ok(pairs.into_iter().map(|(_, k)| k).collect());
    }

    let mut distinct: Vec<String> = keys.into_iter().flatten().collect();
    distinct.sort();
    distinct.dedup();
    Ok(distinct)
}

/// Integer category codes in [`sorted_categories`] order; nulls map to `-1`.
pub fn category_codes(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let order: HashMap<String, usize> = sorted_categories(series)?
        .into_iter()
        .enumerate()
        .map(|(code, key)| (key, code))
        .collect();

    Ok(string_values(series)?
        .into_iter()
        .map(|key| match key {
            Some(key) => order.get(&key).map(|&code| code as f64),
            None => Some(-1.0),
        })
        .collect())
}

/// Mean of `values` per group key, ordered by `key_order`.
///
/// Rows with a null key or a null value are ignored; groups with no values
/// are omitted.
pub fn group_means(
    keys: &[Option<String>],
    values: &[Option<f64>],
    key_order: &[String],
) -> Vec<GroupMean> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

    for (key, value) in keys.iter().zip(values) {
        if let (Some(key), Some(value)) = (key, value)
            && !value.is_nan()
        {
            let entry = sums.entry(key.as_str()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    key_order
        .iter()
        .filter_map(|key| {
            let (sum, count) = sums.get(key.as_str())?;
            Some(GroupMean {
                group: key.clone(),
                mean: sum / *count as f64,
                count: *count,
            })
        })
        .collect()
}
