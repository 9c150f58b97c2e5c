use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::TextUnit;

/// Builds the units for one run from typed text or a file. Typed text wins
/// when both are given.
pub fn collect_units(text: Option<&str>, file: Option<&Path>) -> Result<Vec<TextUnit>> {
    let units = match (text, file) {
        (Some(text), _) if !text.trim().is_empty() => split_lines(text),
        (_, Some(path)) => read_file(path)?,
        _ => {
            return Err(Error::InvalidInput(
                "Please enter some text or select a file to analyze".to_string(),
            ))
        }
    };

    if units.is_empty() {
        return Err(Error::InvalidInput("No valid text found to analyze".to_string()));
    }

    Ok(units)
}

/// One unit per non-blank line.
pub fn split_lines(text: &str) -> Vec<TextUnit> {
    text.lines().filter_map(TextUnit::new).collect()
}

pub fn read_file(path: &Path) -> Result<Vec<TextUnit>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    tracing::debug!("Reading input file {}", path.display());

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xls" => Err(Error::UnsupportedFormat(format!(
            "{} (spreadsheets are not supported, export to CSV first)",
            path.display()
        ))),
        _ => Ok(split_lines(&fs::read_to_string(path)?)),
    }
}

/// Takes the first column of a CSV file with a header row.
fn read_csv(path: &Path) -> Result<Vec<TextUnit>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut units = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(unit) = record.get(0).and_then(TextUnit::new) {
            units.push(unit);
        }
    }

    Ok(units)
}
