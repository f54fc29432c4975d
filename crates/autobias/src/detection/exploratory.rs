//! Exploratory bias: representation of sensitive groups and skewed features.

use super::representation_bias;
use crate::config::SKEW_THRESHOLD;
use crate::error::Result;
use crate::profiler::statistics::skewness;
use crate::types::{ExploratoryBias, SkewedFeature};
use crate::utils::{is_numeric_dtype, present_numbers};
use polars::prelude::*;
use tracing::debug;

/// Detect bias in a dataset without a target.
///
/// Every numeric column in the dataset, sensitive or not, is checked for
/// skewness.
pub fn exploratory_bias(df: &DataFrame, sensitive_columns: &[String]) -> Result<ExploratoryBias> {
    let (representation_bias, skipped_columns) = representation_bias(df, sensitive_columns);

    let mut skewed_features = Vec::new();
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if !is_numeric_dtype(series.dtype()) {
            continue;
        }

        if let Some(skew) = skewness(&present_numbers(series)?)
            && skew.abs() > SKEW_THRESHOLD
        {
            debug!("Column '{}' is skewed ({:.3})", series.name(), skew);
            skewed_features.push(SkewedFeature {
                column: series.name().to_string(),
                skewness: skew,
            });
        }
    }

    Ok(ExploratoryBias {
        representation_bias,
        skewed_features,
        skipped_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_and_skew() {
        let df = df![
            "group" => ["X", "X", "X", "X", "X", "X", "X", "X", "X", "Y"],
            "income" => [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0],
            "age" => [20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0],
        ]
        .unwrap();

        let result = exploratory_bias(&df, &["group".to_string()]).unwrap();

        assert_eq!(result.representation_bias.len(), 1);
        let dist = &result.representation_bias[0].distribution;
        assert_eq!(dist.proportion_of("X"), Some(0.9));
        assert_eq!(dist.proportion_of("Y"), Some(0.1));

        let skewed: Vec<&str> = result
            .skewed_features
            .iter()
            .map(|f| f.column.as_str())
            .collect();
        assert_eq!(skewed, vec!["income"]);
        assert!(result.skipped_columns.is_empty());
    }

    #[test]
    fn test_text_columns_are_not_skew_checked() {
        let df = df!["name" => ["a", "b", "c", "d"]].unwrap();
        let result = exploratory_bias(&df, &[]).unwrap();
        assert!(result.skewed_features.is_empty());
        assert!(result.representation_bias.is_empty());
    }
}
