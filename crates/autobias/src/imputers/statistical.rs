//! Statistical imputation: median for numeric columns, mode otherwise.

use crate::error::Result;
use crate::profiler::statistics::series_distribution;
use crate::utils::{
    DtypeCategory, column_series, fill_boolean_nulls, fill_numeric_nulls, fill_string_nulls,
    series_dtype_category,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the nulls of one column with its median or mode, depending on
    /// its dtype.
    ///
    /// Columns without nulls are left alone. Columns with no non-null value
    /// have no median or mode; they are skipped and the skip is logged.
    pub fn impute_column(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = column_series(df, col_name)?.clone();
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok(());
        }

        match series_dtype_category(&series) {
            DtypeCategory::Numeric => {
                Self::apply_numeric_median(df, &series, null_count, processing_steps)
            }
            DtypeCategory::Text | DtypeCategory::Boolean => {
                Self::apply_mode_imputation(df, &series, null_count, processing_steps)
            }
            DtypeCategory::Datetime | DtypeCategory::Other => {
                debug!("No imputation rule for '{}' ({:?})", col_name, series.dtype());
                Ok(())
            }
        }
    }

    /// Apply median imputation for numeric columns.
    fn apply_numeric_median(
        df: &mut DataFrame,
        series: &Series,
        null_count: usize,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let name = series.name().to_string();
        let Some(median_val) = series.median() else {
            return Self::skip(&name, processing_steps);
        };

        let filled = fill_numeric_nulls(series, median_val)?;
        df.replace(&name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with median: {:.2}",
            null_count, name, median_val
        ));
        Ok(())
    }

    /// Apply mode imputation for text and boolean columns.
    ///
    /// On ties the smallest value wins (lexicographic, `false` before `true`).
    fn apply_mode_imputation(
        df: &mut DataFrame,
        series: &Series,
        null_count: usize,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let name = series.name().to_string();
        let distribution = series_distribution(series)?;
        let Some(mode_val) = distribution.mode() else {
            return Self::skip(&name, processing_steps);
        };

        let filled = if series.dtype() == &DataType::Boolean {
            fill_boolean_nulls(series, mode_val == "true")?
        } else {
            fill_string_nulls(series, mode_val)?
        };
        df.replace(&name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mode: '{}'",
            null_count, name, mode_val
        ));
        Ok(())
    }

    fn skip(col_name: &str, processing_steps: &mut Vec<String>) -> Result<()> {
        warn!("Column '{}' has no non-null values; skipping imputation", col_name);
        processing_steps.push(format!(
            "Skipped imputation for '{}': no non-null values",
            col_name
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_values(df: &DataFrame, col: &str) -> Vec<Option<f64>> {
        df.column(col)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn str_values(df: &DataFrame, col: &str) -> Vec<Option<String>> {
        df.column(col)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_numeric_median_fill() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), None, Some(10.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "values", &mut steps).unwrap();

        assert_eq!(
            f64_values(&df, "values"),
            vec![Some(1.0), Some(3.0), Some(3.0), Some(3.0), Some(10.0)]
        );
        assert!(steps[0].contains("median"));
    }

    #[test]
    fn test_integer_column_median_fill() {
        let mut df = df!["n" => [Some(1i64), Some(2), None, Some(3), Some(4)]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "n", &mut steps).unwrap();

        assert_eq!(df.column("n").unwrap().null_count(), 0);
        assert_eq!(f64_values(&df, "n")[2], Some(2.5));
    }

    #[test]
    fn test_mode_fill_with_tie_takes_smallest() {
        let mut df = df![
            "color" => [Some("red"), Some("blue"), None, Some("blue"), Some("red")],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "color", &mut steps).unwrap();

        assert_eq!(str_values(&df, "color")[2], Some("blue".to_string()));
        assert!(steps[0].contains("mode: 'blue'"));
    }

    #[test]
    fn test_single_value_tie_fills_smallest() {
        let mut df = df!["g" => [Some("b"), Some("a"), None]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "g", &mut steps).unwrap();

        assert_eq!(
            str_values(&df, "g"),
            vec![Some("b".to_string()), Some("a".to_string()), Some("a".to_string())]
        );
    }

    #[test]
    fn test_boolean_tie_fills_false() {
        let mut df = df!["flag" => [Some(true), None, Some(false)]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "flag", &mut steps).unwrap();

        let values: Vec<Option<bool>> = df
            .column("flag")
            .unwrap()
            .as_materialized_series()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(true), Some(false), Some(false)]);
    }

    #[test]
    fn test_boolean_mode_fill() {
        let mut df = df!["flag" => [Some(false), Some(false), None, Some(true)]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "flag", &mut steps).unwrap();

        let values: Vec<Option<bool>> = df
            .column("flag")
            .unwrap()
            .as_materialized_series()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(false), Some(false), Some(false), Some(true)]);
    }

    #[test]
    fn test_all_null_column_is_skipped() {
        let mut df = df!["empty" => [None::<f64>, None, None]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "empty", &mut steps).unwrap();

        assert_eq!(df.column("empty").unwrap().null_count(), 3);
        assert!(steps[0].starts_with("Skipped imputation"));
    }

    #[test]
    fn test_no_nulls_is_noop() {
        let mut df = df!["v" => [1.0, 2.0]].unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::impute_column(&mut df, "v", &mut steps).unwrap();
        assert!(steps.is_empty());
    }
}
