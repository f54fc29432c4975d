//! Bias detection: one pure analysis per dataset kind.
//!
//! Each detector reads the dataset and returns a typed result bundle of raw
//! statistics. Nothing is mutated. A sensitive column that is missing or
//! cannot be analysed is logged, recorded in the bundle's
//! `skipped_columns`, and does not abort the run.

mod classification;
mod exploratory;
mod regression;

pub use classification::classification_bias;
pub use exploratory::exploratory_bias;
pub use regression::regression_bias;
pub(crate) use regression::target_values;

use crate::error::{BiasError, Result};
use crate::profiler::statistics::series_distribution;
use crate::types::{BiasBundle, ColumnDistribution, DatasetKind};
use crate::utils::column_series;
use polars::prelude::*;
use tracing::{info, warn};

/// Dispatches to the detector for a dataset kind.
pub struct BiasDetector;

impl BiasDetector {
    /// Run the detector for `kind`.
    ///
    /// Classification and regression need a target; passing `None` for
    /// those kinds is an [`BiasError::InvalidConfig`].
    pub fn detect(
        df: &DataFrame,
        kind: DatasetKind,
        target: Option<&str>,
        sensitive_columns: &[String],
    ) -> Result<BiasBundle> {
        info!(
            "Running {} bias detection over {} sensitive column(s)",
            kind,
            sensitive_columns.len()
        );

        let bundle = match kind {
            DatasetKind::Exploratory => {
                BiasBundle::Exploratory(exploratory_bias(df, sensitive_columns)?)
            }
            DatasetKind::Classification => BiasBundle::Classification(classification_bias(
                df,
                require_target(kind, target)?,
                sensitive_columns,
            )?),
            DatasetKind::Regression => BiasBundle::Regression(regression_bias(
                df,
                require_target(kind, target)?,
                sensitive_columns,
            )?),
        };

        Ok(bundle)
    }
}

fn require_target(kind: DatasetKind, target: Option<&str>) -> Result<&str> {
    target.ok_or_else(|| BiasError::InvalidConfig(format!("{kind} detection requires a target")))
}

/// Normalized value distribution of each sensitive column.
///
/// Returns the distributions plus the names of columns that were skipped.
pub(crate) fn representation_bias(
    df: &DataFrame,
    sensitive_columns: &[String],
) -> (Vec<ColumnDistribution>, Vec<String>) {
    let mut distributions = Vec::with_capacity(sensitive_columns.len());
    let mut skipped = Vec::new();

    for col in sensitive_columns {
        let result = column_series(df, col)
            .and_then(|series| series_distribution(series).map_err(BiasError::from));

        match result {
            Ok(distribution) => distributions.push(ColumnDistribution {
                column: col.clone(),
                distribution,
            }),
            Err(e) => {
                warn!("Skipping sensitive column '{}': {}", col, e);
                skipped.push(col.clone());
            }
        }
    }

    (distributions, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_dispatches_by_kind() {
        let df = df![
            "y" => ["a", "a", "b"],
            "g" => ["x", "y", "x"],
        ]
        .unwrap();
        let sensitive = vec!["g".to_string()];

        let bundle =
            BiasDetector::detect(&df, DatasetKind::Classification, Some("y"), &sensitive).unwrap();
        assert_eq!(bundle.kind(), DatasetKind::Classification);

        let bundle = BiasDetector::detect(&df, DatasetKind::Exploratory, None, &sensitive).unwrap();
        assert_eq!(bundle.kind(), DatasetKind::Exploratory);
    }

    #[test]
    fn test_detect_requires_target_for_supervised_kinds() {
        let df = df!["y" => [1.0, 2.0]].unwrap();
        let err = BiasDetector::detect(&df, DatasetKind::Regression, None, &[]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_representation_bias_skips_missing_columns() {
        let df = df!["g" => ["x", "x", "y"]].unwrap();
        let sensitive = vec!["g".to_string(), "nope".to_string()];

        let (dists, skipped) = representation_bias(&df, &sensitive);
        assert_eq!(dists.len(), 1);
        assert_eq!(dists[0].column, "g");
        assert_eq!(skipped, vec!["nope".to_string()]);
    }
}
