//! Shared utilities for reading and rebuilding polars columns.
//!
//! Every analysis in this crate works on plain `Vec<Option<_>>` views of a
//! column, so the conversions live here in one place.

use crate::error::{BiasError, Result};
use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for bias analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text or categorical type
    Text,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a DataType holds text or categories.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if is_text_dtype(dtype) {
        DtypeCategory::Text
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column by name, mapping a miss to [`BiasError::ColumnNotFound`].
pub fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| BiasError::ColumnNotFound(name.to_string()))
}

/// Whether the dataset has a column with this name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Column names in schema order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a column as optional `f64` values.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

/// Read a column as optional strings (the key form used for grouping).
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Numeric column values with nulls and NaNs removed.
pub fn present_numbers(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Number of distinct non-null values in a column.
pub fn distinct_count(series: &Series) -> PolarsResult<usize> {
    let distinct: HashSet<String> = string_values(series)?.into_iter().flatten().collect();
    Ok(distinct.len())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a Series with a numeric value, producing `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<f64> = numeric_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a text Series, keeping its original dtype.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<String> = string_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect();
    let result = Series::new(series.name().clone(), filled);
    if series.dtype() == &DataType::String {
        Ok(result)
    } else {
        result.cast(series.dtype())
    }
}

/// Fill null values in a Boolean Series.
pub fn fill_boolean_nulls(series: &Series, fill_value: bool) -> PolarsResult<Series> {
    let filled: Vec<bool> = series
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Rebuild a `Float64` column from optional values.
pub fn float_series(name: PlSmallStr, values: Vec<Option<f64>>) -> Series {
    Series::new(name, values)
}

// =============================================================================
// Tests
// =============================================================================
