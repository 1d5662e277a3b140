//! CSV loading for listing datasets
//!
//! Reads a delimited file with a header row, keeps only the columns named in
//! the schema, and drops every row with a missing or malformed value in one of
//! those columns.

use super::{Column, ColumnKind, Dataset};
use crate::errors::{StatsError, StatsResult};
use std::path::Path;

/// One column to extract from the file
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Header name in the file
    pub name: String,
    /// How the raw text is interpreted
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Numeric,
        }
    }

    pub fn categorical(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnKind::Categorical,
        }
    }
}

/// Result of loading a file
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Cleaned dataset
    pub dataset: Dataset,
    /// Number of data rows read from the file
    pub rows_read: usize,
    /// Number of rows dropped because a schema column was missing or malformed
    pub dropped_rows: usize,
}

/// Columns used by the vehicle listing analysis.
///
/// `engine` and `fuel_tank_capacity` are typically recorded with units
/// ("1198 cc", "35.0 l"), which numeric parsing strips.
pub fn vehicle_listing_schema() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::numeric("price"),
        ColumnSpec::numeric("year"),
        ColumnSpec::numeric("kilometer"),
        ColumnSpec::categorical("fuel_type"),
        ColumnSpec::categorical("transmission"),
        ColumnSpec::numeric("engine"),
        ColumnSpec::categorical("drivetrain"),
        ColumnSpec::categorical("seating_capacity"),
        ColumnSpec::numeric("fuel_tank_capacity"),
    ]
}

/// Load the schema columns of a CSV file into a [`Dataset`]
///
/// # Arguments
/// * `path` - Path to the CSV file (first row is the header)
/// * `schema` - Columns to extract and their kinds
pub fn load_csv<P: AsRef<Path>>(path: P, schema: &[ColumnSpec]) -> StatsResult<LoadReport> {
    let path = path.as_ref();
    if schema.is_empty() {
        return Err(StatsError::EmptyInput { field: "schema" });
    }

    let csv_error = |e: csv::Error| StatsError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();

    let positions = schema
        .iter()
        .map(|spec| {
            headers
                .iter()
                .position(|h| normalize_header(h) == normalize_header(&spec.name))
                .ok_or_else(|| {
                    StatsError::invalid(format!(
                        "column '{}' not found; available columns: {:?}",
                        spec.name,
                        headers.iter().collect::<Vec<_>>()
                    ))
                })
        })
        .collect::<StatsResult<Vec<usize>>>()?;

    let mut numeric: Vec<Vec<f64>> = vec![Vec::new(); schema.len()];
    let mut categorical: Vec<Vec<String>> = vec![Vec::new(); schema.len()];
    let mut rows_read = 0;
    let mut dropped_rows = 0;

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows_read += 1;

        let parsed: Option<Vec<Cell>> = schema
            .iter()
            .zip(&positions)
            .map(|(spec, &pos)| parse_cell(record.get(pos)?, spec.kind))
            .collect();

        match parsed {
            Some(cells) => {
                for (j, cell) in cells.into_iter().enumerate() {
                    match cell {
                        Cell::Number(x) => numeric[j].push(x),
                        Cell::Label(s) => categorical[j].push(s),
                    }
                }
            }
            None => dropped_rows += 1,
        }
    }

    let mut dataset = Dataset::new();
    for (j, spec) in schema.iter().enumerate() {
        let column = match spec.kind {
            ColumnKind::Numeric => Column::Numeric(std::mem::take(&mut numeric[j])),
            ColumnKind::Categorical => Column::Categorical(std::mem::take(&mut categorical[j])),
        };
        dataset = dataset.with_column(&spec.name, column)?;
    }

    tracing::info!(
        path = %path.display(),
        rows_read,
        dropped_rows,
        kept = dataset.n_rows(),
        "loaded dataset"
    );

    Ok(LoadReport {
        dataset,
        rows_read,
        dropped_rows,
    })
}

enum Cell {
    Number(f64),
    Label(String),
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-'], "_")
}

fn is_missing(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "na" | "n/a" | "nan" | "null" | "none"
    )
}

fn parse_cell(raw: &str, kind: ColumnKind) -> Option<Cell> {
    if is_missing(raw) {
        return None;
    }
    match kind {
        ColumnKind::Numeric => parse_number(raw).map(Cell::Number),
        ColumnKind::Categorical => Some(Cell::Label(raw.trim().to_string())),
    }
}

/// Parse a number that may carry thousands separators or a trailing unit
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    let end = cleaned
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map_or(cleaned.len(), |(i, _)| i);
    let value: f64 = cleaned[..end].parse().ok()?;
    value.is_finite().then_some(value)
}
