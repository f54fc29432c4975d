//! Target-column suitability scoring.

use crate::config::{CLASSIFICATION_CARDINALITY_LIMIT, TARGET_SUGGESTION_KEYWORDS};
use crate::utils::DtypeCategory;
use serde::{Deserialize, Serialize};

/// Numeric columns need more distinct values than this to look like a
/// regression target.
const REGRESSION_LIKE_MIN_DISTINCT: usize = 20;

/// A column ranked as a possible target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSuggestion {
    pub column: String,
    pub score: u32,
}

/// Score how suitable a column is as a target.
///
/// +3 for a keyword hit in the name (case-insensitive), +2 for a text column
/// with few distinct values, +1 for a numeric column with many.
pub(crate) fn score_target_candidate(
    col_name: &str,
    category: DtypeCategory,
    distinct: usize,
) -> u32 {
    let col_lower = col_name.to_lowercase();
    let mut score = 0;

    if TARGET_SUGGESTION_KEYWORDS
        .iter()
        .any(|k| col_lower.contains(k))
    {
        score += 3;
    }

    match category {
        DtypeCategory::Text if distinct <= CLASSIFICATION_CARDINALITY_LIMIT => score += 2,
        DtypeCategory::Numeric if distinct > REGRESSION_LIKE_MIN_DISTINCT => score += 1,
        _ => {}
    }

    score
}
