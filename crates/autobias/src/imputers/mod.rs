//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median, text and boolean columns
//! with their mode.

mod statistical;

pub use statistical::StatisticalImputer;
