//! Contingency tables and the Pearson chi-square statistic
//!
//! - Cross-tabulation of two categorical columns
//! - Pearson chi-square statistic (no continuity correction)
//! - Theoretical chi-square test of independence

use super::ChiSquareResult;
use crate::data::Dataset;
use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::BTreeMap;

/// Two-way table of counts
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    /// Levels of the response column (table rows), sorted
    pub row_levels: Vec<String>,
    /// Levels of the explanatory column (table columns), sorted
    pub col_levels: Vec<String>,
    /// `counts[i][j]` = rows with response level i and explanatory level j
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    /// Cross-tabulate two categorical columns of a dataset
    pub fn from_columns(dataset: &Dataset, response: &str, explanatory: &str) -> StatsResult<Self> {
        let rows = dataset.categorical(response)?;
        let cols = dataset.categorical(explanatory)?;

        let row_index = level_index(rows);
        let col_index = level_index(cols);

        let mut counts = vec![vec![0usize; col_index.len()]; row_index.len()];
        for (r, c) in rows.iter().zip(cols) {
            counts[row_index[r.as_str()]][col_index[c.as_str()]] += 1;
        }

        Ok(Self {
            row_levels: row_index.keys().map(|k| k.to_string()).collect(),
            col_levels: col_index.keys().map(|k| k.to_string()).collect(),
            counts,
        })
    }

    /// Build a table directly from counts, with generated level names
    pub fn from_counts(counts: Vec<Vec<usize>>) -> StatsResult<Self> {
        if counts.is_empty() {
            return Err(StatsError::invalid("Empty contingency table"));
        }
        let n_cols = counts[0].len();
        for (i, row) in counts.iter().enumerate() {
            if row.len() != n_cols {
                return Err(StatsError::DimensionMismatchMsg(format!(
                    "Row {} has different number of columns",
                    i
                )));
            }
        }
        Ok(Self {
            row_levels: (0..counts.len()).map(|i| format!("r{}", i)).collect(),
            col_levels: (0..n_cols).map(|j| format!("c{}", j)).collect(),
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.col_levels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Degrees of freedom for the independence test
    pub fn df(&self) -> usize {
        (self.row_levels.len().saturating_sub(1)) * (self.col_levels.len().saturating_sub(1))
    }

    /// Pearson chi-square statistic: sum of (O - E)^2 / E
    ///
    /// Fails when either variable has fewer than 2 categories or a margin is
    /// empty (expected count of zero).
    pub fn pearson_statistic(&self) -> StatsResult<f64> {
        if self.row_levels.len() < 2 || self.col_levels.len() < 2 {
            return Err(StatsError::invalid(format!(
                "chi-square needs at least 2 categories per variable, got {}x{}",
                self.row_levels.len(),
                self.col_levels.len()
            )));
        }

        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let total = self.total() as f64;

        if row_totals.contains(&0) || col_totals.contains(&0) {
            return Err(StatsError::invalid(
                "contingency table has an empty margin; expected counts are zero",
            ));
        }

        let mut statistic = 0.0;
        for (i, row) in self.counts.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_totals[i] as f64 * col_totals[j] as f64 / total;
                let diff = observed as f64 - expected;
                statistic += diff * diff / expected;
            }
        }
        Ok(statistic)
    }
}

fn level_index(labels: &[String]) -> BTreeMap<&str, usize> {
    let mut index: BTreeMap<&str, usize> = labels.iter().map(|l| (l.as_str(), 0)).collect();
    for (i, v) in index.values_mut().enumerate() {
        *v = i;
    }
    index
}

/// Chi-square test for independence using the asymptotic distribution
///
/// # Arguments
/// * `table` - Contingency table of counts
pub fn chisq_test(table: &ContingencyTable) -> StatsResult<ChiSquareResult> {
    let statistic = table.pearson_statistic()?;
    let df = table.df();
    let dist = ChiSquared::new(df as f64)
        .map_err(|e| StatsError::invalid(format!("chi-square distribution: {}", e)))?;

    Ok(ChiSquareResult {
        statistic,
        p_value: dist.sf(statistic),
        df,
        method: "Pearson's chi-square test for independence".into(),
    })
}
