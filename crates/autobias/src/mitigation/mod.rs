//! Bias mitigation: data-level transforms that return a new dataset.
//!
//! The input dataset is never modified. Exploratory datasets have no
//! mitigation and are rejected with [`BiasError::MitigationUnsupported`].

mod classification;
mod regression;

pub use classification::mitigate_classification;
pub use regression::mitigate_regression;

use crate::error::{BiasError, Result};
use crate::types::DatasetKind;
use polars::prelude::*;
use tracing::info;

/// Dispatches to the mitigation transform for a dataset kind.
pub struct Mitigator;

impl Mitigator {
    /// Apply the transform for `kind` and return the mitigated dataset.
    ///
    /// `seed` only affects classification rebalancing.
    pub fn mitigate(
        df: &DataFrame,
        kind: DatasetKind,
        target: Option<&str>,
        sensitive_columns: &[String],
        seed: u64,
    ) -> Result<DataFrame> {
        if !kind.supports_mitigation() {
            return Err(BiasError::MitigationUnsupported(kind));
        }
        let target = target.ok_or_else(|| {
            BiasError::InvalidConfig(format!("{kind} mitigation requires a target"))
        })?;

        info!("Mitigating {} dataset on target '{}'", kind, target);
        match kind {
            DatasetKind::Classification => {
                mitigate_classification(df, target, sensitive_columns, seed)
            }
            DatasetKind::Regression => mitigate_regression(df, target, sensitive_columns),
            DatasetKind::Exploratory => Err(BiasError::MitigationUnsupported(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploratory_is_unsupported() {
        let df = df!["a" => [1, 2, 3]].unwrap();
        let err = Mitigator::mitigate(&df, DatasetKind::Exploratory, None, &[], 42).unwrap_err();
        assert!(matches!(
            err,
            BiasError::MitigationUnsupported(DatasetKind::Exploratory)
        ));
    }

    #[test]
    fn test_missing_target_is_invalid_config() {
        let df = df!["a" => [1, 2, 3]].unwrap();
        let err =
            Mitigator::mitigate(&df, DatasetKind::Classification, None, &[], 42).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_dispatch_to_classification() {
        let df = df!["y" => ["a", "a", "a", "b"]].unwrap();
        let out =
            Mitigator::mitigate(&df, DatasetKind::Classification, Some("y"), &[], 42).unwrap();
        assert_eq!(out.height(), 6);
    }
}
