//! Dataset cleaning ahead of bias analysis.
//!
//! This module provides:
//! - Exact-duplicate row removal (first occurrence kept, order preserved)
//! - Missing-value imputation through [`StatisticalImputer`]

use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::utils::column_names;
use polars::prelude::*;
use tracing::{debug, info};

/// Cleans a raw dataset before it is classified and analysed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Preprocessor;

impl Preprocessor {
    /// Return a cleaned copy of `df` together with a log of what was done.
    ///
    /// Steps, in order:
    /// 1. Remove exact-duplicate rows
    /// 2. Fill missing values (median for numeric, mode for text)
    pub fn preprocess(&self, df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut actions = Vec::new();

        info!("Preprocessing dataset {:?}...", df.shape());

        let before = df.height();
        let mut cleaned = Self::remove_duplicates(df)?;
        let removed = before - cleaned.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            actions.push(format!("Removed {} duplicate rows ({:.1}%)", removed, pct));
            debug!("Removed {} duplicate rows", removed);
        } else {
            actions.push("No duplicate rows found".to_string());
        }

        for col_name in column_names(&cleaned) {
            StatisticalImputer::impute_column(&mut cleaned, &col_name, &mut actions)?;
        }

        Ok((cleaned, actions))
    }

    /// Drop rows identical to an earlier row in every column.
    pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(df.clone());
        }
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }
}

/// Convenience wrapper around [`Preprocessor::preprocess`] that discards the
/// action log.
pub fn preprocess(df: &DataFrame) -> Result<DataFrame> {
    Preprocessor.preprocess(df).map(|(cleaned, _)| cleaned)
}
