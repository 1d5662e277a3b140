//! Descriptive summaries

use super::Dataset;
use crate::errors::{StatsError, StatsResult};
use std::collections::BTreeMap;

/// Five-number summary plus mean and standard deviation
#[derive(Debug, Clone)]
pub struct Describe {
    pub column: String,
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (NaN for a single observation)
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summarise a numeric column
pub fn describe(dataset: &Dataset, column: &str) -> StatsResult<Describe> {
    let values = dataset.numeric(column)?;
    if values.is_empty() {
        return Err(StatsError::EmptyInput { field: "column" });
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = if n > 1 {
        (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(Describe {
        column: column.to_string(),
        n,
        mean,
        std_dev,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Category counts in label order
pub fn count_by(dataset: &Dataset, column: &str) -> StatsResult<Vec<(String, usize)>> {
    let labels = dataset.categorical(column)?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for l in labels {
        *counts.entry(l.as_str()).or_insert(0) += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect())
}

/// Mean of `response` within each level of `group`, with group sizes
pub fn group_means(
    dataset: &Dataset,
    response: &str,
    group: &str,
) -> StatsResult<Vec<(String, usize, f64)>> {
    let values = dataset.numeric(response)?;
    let labels = dataset.categorical(group)?;
    let mut acc: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for (x, l) in values.iter().zip(labels) {
        let entry = acc.entry(l.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += x;
    }
    Ok(acc
        .into_iter()
        .map(|(k, (n, sum))| (k.to_string(), n, sum / n as f64))
        .collect())
}

/// Linear-interpolation quantile (type 7) of sorted data
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
