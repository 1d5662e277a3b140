//! In-memory tabular data
//!
//! A [`Dataset`] is an ordered set of equally long, named, typed columns.
//! Every transformation returns a new dataset; nothing is mutated in place
//! once a dataset has been handed to the inference engine.

pub mod cleaning;
pub mod loader;
pub mod summary;

pub use loader::{load_csv, vehicle_listing_schema, ColumnSpec, LoadReport};

use crate::errors::{StatsError, StatsResult};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single typed column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Select values by index, repetitions allowed
    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Ordered collection of named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a numeric column
    pub fn with_numeric(self, name: &str, values: Vec<f64>) -> StatsResult<Self> {
        self.with_column(name, Column::Numeric(values))
    }

    /// Add (or replace) a categorical column
    pub fn with_categorical<S: Into<String>>(
        self,
        name: &str,
        values: Vec<S>,
    ) -> StatsResult<Self> {
        self.with_column(
            name,
            Column::Categorical(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Add a column, replacing any existing column of the same name.
    ///
    /// The column must have as many values as the dataset has rows (any
    /// length is accepted for the first column).
    pub fn with_column(mut self, name: &str, column: Column) -> StatsResult<Self> {
        let replacing = self.names.iter().position(|n| n == name);
        let others_share_len = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .all(|(_, c)| c.len() == column.len());
        if !others_share_len {
            return Err(StatsError::DimensionMismatchMsg(format!(
                "column '{}' has {} values, dataset has {} rows",
                name,
                column.len(),
                self.n_rows()
            )));
        }

        match replacing {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> StatsResult<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| StatsError::invalid(format!("column '{}' not found", name)))
    }

    /// Values of a numeric column
    pub fn numeric(&self, name: &str) -> StatsResult<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(StatsError::invalid(format!(
                "column '{}' is categorical, expected numeric",
                name
            ))),
        }
    }

    /// Values of a categorical column
    pub fn categorical(&self, name: &str) -> StatsResult<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Ok(v),
            Column::Numeric(_) => Err(StatsError::invalid(format!(
                "column '{}' is numeric, expected categorical",
                name
            ))),
        }
    }

    /// Build a dataset from the given row indices (repetition allowed)
    pub fn take_rows(&self, indices: &[usize]) -> StatsResult<Dataset> {
        let n = self.n_rows();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(StatsError::invalid(format!(
                "row index {} out of bounds for {} rows",
                bad, n
            )));
        }
        Ok(Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        })
    }

    /// Keep the rows where `mask` is true
    pub fn filter_rows(&self, mask: &[bool]) -> StatsResult<Dataset> {
        if mask.len() != self.n_rows() {
            return Err(StatsError::DimensionMismatchMsg(format!(
                "mask has {} entries, dataset has {} rows",
                mask.len(),
                self.n_rows()
            )));
        }
        let kept: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.take_rows(&kept)
    }
}
