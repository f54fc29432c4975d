//! Dataset profiling: deciding which analysis branch a dataset takes.
//!
//! This module provides:
//! - Dataset kind classification from the target column
//! - Ranked target-column suggestions
//! - The descriptive statistics shared by detectors and mitigators

pub mod statistics;
mod target_suggestion;

pub use target_suggestion::TargetSuggestion;

use crate::config::CLASSIFICATION_CARDINALITY_LIMIT;
use crate::error::Result;
use crate::types::DatasetKind;
use crate::utils::{column_series, distinct_count, has_column, is_text_dtype, series_dtype_category};
use polars::prelude::*;
use target_suggestion::score_target_candidate;
use tracing::debug;

/// Classifies datasets and ranks target candidates.
pub struct DatasetClassifier;

impl DatasetClassifier {
    /// Decide the analysis branch for a dataset.
    ///
    /// No target, or a target missing from the schema, means
    /// [`DatasetKind::Exploratory`]. A text target or one with at most ten
    /// distinct values means classification; anything else is regression.
    pub fn classify(df: &DataFrame, target: Option<&str>) -> Result<DatasetKind> {
        let Some(target) = target else {
            return Ok(DatasetKind::Exploratory);
        };

        if !has_column(df, target) {
            debug!("Target '{}' not in dataset; treating as exploratory", target);
            return Ok(DatasetKind::Exploratory);
        }

        let series = column_series(df, target)?;
        let distinct = distinct_count(series)?;

        let kind = if is_text_dtype(series.dtype()) || distinct <= CLASSIFICATION_CARDINALITY_LIMIT
        {
            DatasetKind::Classification
        } else {
            DatasetKind::Regression
        };

        debug!(
            "Target '{}' ({:?}, {} distinct) -> {}",
            target,
            series.dtype(),
            distinct,
            kind
        );
        Ok(kind)
    }

    /// Column names ordered by target suitability, best first.
    pub fn suggest_targets(df: &DataFrame) -> Result<Vec<String>> {
        Ok(Self::ranked_targets(df)?
            .into_iter()
            .map(|s| s.column)
            .collect())
    }

    /// Target suggestions with their suitability scores.
    ///
    /// Columns scoring zero are left out. Equal scores keep schema order.
    pub fn ranked_targets(df: &DataFrame) -> Result<Vec<TargetSuggestion>> {
        let mut suggestions = Vec::new();

        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let distinct = distinct_count(series)?;
            let score =
                score_target_candidate(series.name(), series_dtype_category(series), distinct);

            if score > 0 {
                suggestions.push(TargetSuggestion {
                    column: series.name().to_string(),
                    score,
                });
            }
        }

        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(suggestions)
    }
}
