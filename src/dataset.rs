//! Dataset service: CSV reading and column statistics.
//!
//! An external collaborator of the core — nothing here is invoked by the
//! network itself. It reads the semicolon-separated CSV files the training
//! examples use (trimmed cells, optional quotes, comma decimal separators)
//! and computes the per-column statistics that feed the `scale_inputs`
//! configuration option.

use crate::config::ColumnRange;
use crate::error::{NetError, Result};
use crate::utils::scaling;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// CSV parsing options.
///
/// # Fields
///
/// * `delimiter` - Cell separator (default `;`)
/// * `decimal_comma` - Treat `,` inside cells as the decimal separator
/// * `skip_header` - Drop the first non-empty line
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: char,
    pub decimal_comma: bool,
    pub skip_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_comma: true,
            skip_header: false,
        }
    }
}

/// Reads a dataset from a CSV file with default options.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    read_csv_with(path, &CsvOptions::default())
}

/// Reads a dataset from a CSV file.
///
/// Blank lines are skipped; every remaining cell must parse as a number
/// after trimming, quote stripping and decimal-comma normalization.
///
/// # Errors
///
/// * `Io` - the file cannot be read
/// * `Input` - a cell does not parse as a number (the message names the
///   row and column)
pub fn read_csv_with<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Vec<Vec<f64>>> {
    let contents = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    let mut skipped_header = !options.skip_header;

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.split(options.delimiter).all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if !skipped_header {
            skipped_header = true;
            continue;
        }

        let mut row = Vec::new();
        for (col, cell) in line.split(options.delimiter).enumerate() {
            let mut cell = cell.trim().trim_matches('"').to_string();
            if options.decimal_comma {
                cell = cell.replace(',', ".");
            }
            let value: f64 = cell.parse().map_err(|_| {
                NetError::Input(format!(
                    "line {}, column {col}: '{cell}' is not a number",
                    line_no + 1
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// One column of a dataset, skipping rows that are too short.
pub fn column(dataset: &[Vec<f64>], index: usize) -> Vec<f64> {
    dataset
        .iter()
        .filter_map(|row| row.get(index).copied())
        .collect()
}

/// Min/max bounds of every column, in the shape the `scale_inputs`
/// configuration option consumes.
pub fn column_ranges(dataset: &[Vec<f64>]) -> BTreeMap<usize, ColumnRange> {
    let width = dataset.first().map(|row| row.len()).unwrap_or(0);
    (0..width)
        .map(|i| {
            let values = column(dataset, i);
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (i, ColumnRange { min, max })
        })
        .collect()
}

/// Standardize the given columns in place with the z-score transform.
pub fn standardize_columns(dataset: &mut [Vec<f64>], indexes: &[usize]) {
    for &index in indexes {
        let standardized = scaling::zscore(&column(dataset, index));
        let mut values = standardized.into_iter();
        for row in dataset.iter_mut() {
            if let Some(cell) = row.get_mut(index) {
                if let Some(v) = values.next() {
                    *cell = v;
                }
            }
        }
    }
}
