//! CSV loading with fallbacks for sloppily quoted files.

use crate::error::Result;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

const INFER_SCHEMA_ROWS: usize = 100;

/// Load a CSV file with a header row.
///
/// Tries, in order: standard quote-aware parsing, parsing with default
/// options, and parsing a copy with doubled quotes collapsed and blank
/// lines removed.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Default parse options
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading with default options failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()?;
    Ok(df)
}

fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
