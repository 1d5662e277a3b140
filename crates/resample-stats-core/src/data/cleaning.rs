//! Column transformations used before modelling
//!
//! Each function takes a dataset by reference and returns a new one.

use super::{Column, Dataset};
use crate::errors::{StatsError, StatsResult};
use std::collections::BTreeMap;

/// Add `age_col = reference_year - year_col`
pub fn derive_age(
    dataset: &Dataset,
    year_col: &str,
    reference_year: f64,
    age_col: &str,
) -> StatsResult<Dataset> {
    let years = dataset.numeric(year_col)?;
    if let Some(y) = years.iter().find(|&&y| y > reference_year) {
        return Err(StatsError::invalid(format!(
            "year {} is after the reference year {}",
            y, reference_year
        )));
    }
    let ages: Vec<f64> = years.iter().map(|y| reference_year - y).collect();
    dataset.clone().with_numeric(age_col, ages)
}

/// Add `new_col = ln(col)`; every value must be strictly positive
pub fn log_transform(dataset: &Dataset, col: &str, new_col: &str) -> StatsResult<Dataset> {
    let values = dataset.numeric(col)?;
    if let Some(v) = values.iter().find(|&&v| v <= 0.0) {
        return Err(StatsError::invalid(format!(
            "cannot take the log of non-positive value {} in '{}'",
            v, col
        )));
    }
    let logged: Vec<f64> = values.iter().map(|v| v.ln()).collect();
    dataset.clone().with_numeric(new_col, logged)
}

/// Keep only rows whose category in `col` is one of `allowed`
pub fn keep_categories(dataset: &Dataset, col: &str, allowed: &[&str]) -> StatsResult<Dataset> {
    let labels = dataset.categorical(col)?;
    let mask: Vec<bool> = labels
        .iter()
        .map(|l| allowed.contains(&l.as_str()))
        .collect();
    dataset.filter_rows(&mask)
}

/// Relabel categories seen fewer than `min_count` times as `other_label`
pub fn lump_rare(
    dataset: &Dataset,
    col: &str,
    min_count: usize,
    other_label: &str,
) -> StatsResult<Dataset> {
    let labels = dataset.categorical(col)?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for l in labels {
        *counts.entry(l.as_str()).or_insert(0) += 1;
    }
    let lumped: Vec<String> = labels
        .iter()
        .map(|l| {
            if counts[l.as_str()] < min_count {
                other_label.to_string()
            } else {
                l.clone()
            }
        })
        .collect();
    dataset.clone().with_column(col, Column::Categorical(lumped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Dataset {
        Dataset::new()
            .with_numeric("price", vec![505000.0, 450000.0, 220000.0, 799000.0])
            .unwrap()
            .with_numeric("year", vec![2017.0, 2014.0, 2011.0, 2019.0])
            .unwrap()
            .with_categorical("fuel_type", vec!["Petrol", "Diesel", "Petrol", "CNG"])
            .unwrap()
    }

    #[test]
    fn test_derive_age() {
        let data = derive_age(&listings(), "year", 2023.0, "age").unwrap();
        assert_eq!(data.numeric("age").unwrap(), &[6.0, 9.0, 12.0, 4.0]);
        assert!(derive_age(&listings(), "year", 2015.0, "age").is_err());
    }

    #[test]
    fn test_log_transform() {
        let data = log_transform(&listings(), "price", "log_price").unwrap();
        let logged = data.numeric("log_price").unwrap();
        assert!((logged[0] - 505000.0_f64.ln()).abs() < 1e-12);

        let bad = listings().with_numeric("price", vec![1.0, 0.0, 2.0, 3.0]).unwrap();
        assert!(log_transform(&bad, "price", "log_price").is_err());
    }

    #[test]
    fn test_keep_categories() {
        let data = keep_categories(&listings(), "fuel_type", &["Petrol", "Diesel"]).unwrap();
        assert_eq!(data.n_rows(), 3);
        assert_eq!(data.numeric("price").unwrap(), &[505000.0, 450000.0, 220000.0]);
    }

    #[test]
    fn test_lump_rare() {
        let data = lump_rare(&listings(), "fuel_type", 2, "Other").unwrap();
        assert_eq!(
            data.categorical("fuel_type").unwrap(),
            &["Petrol", "Other", "Petrol", "Other"]
        );
    }
}
