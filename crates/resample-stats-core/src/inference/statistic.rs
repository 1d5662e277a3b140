//! Statistic calculators
//!
//! - Mean of a numeric column
//! - Proportion of a success category
//! - Difference in group means
//! - Pearson chi-square association

use super::categorical::ContingencyTable;
use crate::data::Dataset;
use crate::errors::{StatsError, StatsResult};

/// Summary statistic computed from a dataset, with the columns it needs
#[derive(Debug, Clone, PartialEq)]
pub enum Statistic {
    Mean {
        column: String,
    },
    Proportion {
        column: String,
        success: String,
    },
    /// `mean(response | group == order.0) - mean(response | group == order.1)`
    DiffInMeans {
        response: String,
        group: String,
        order: (String, String),
    },
    ChiSquare {
        response: String,
        explanatory: String,
    },
}

impl Statistic {
    pub fn mean(column: &str) -> Self {
        Statistic::Mean {
            column: column.to_string(),
        }
    }

    pub fn proportion(column: &str, success: &str) -> Self {
        Statistic::Proportion {
            column: column.to_string(),
            success: success.to_string(),
        }
    }

    pub fn diff_in_means(response: &str, group: &str, first: &str, second: &str) -> Self {
        Statistic::DiffInMeans {
            response: response.to_string(),
            group: group.to_string(),
            order: (first.to_string(), second.to_string()),
        }
    }

    pub fn chi_square(response: &str, explanatory: &str) -> Self {
        Statistic::ChiSquare {
            response: response.to_string(),
            explanatory: explanatory.to_string(),
        }
    }

    /// Short label used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean { .. } => "mean",
            Statistic::Proportion { .. } => "proportion",
            Statistic::DiffInMeans { .. } => "diff in means",
            Statistic::ChiSquare { .. } => "chi-square",
        }
    }

    /// Column the statistic summarises
    pub fn response(&self) -> &str {
        match self {
            Statistic::Mean { column } | Statistic::Proportion { column, .. } => column.as_str(),
            Statistic::DiffInMeans { response, .. } | Statistic::ChiSquare { response, .. } => {
                response.as_str()
            }
        }
    }

    /// Grouping/explanatory column, for two-variable statistics
    pub fn explanatory(&self) -> Option<&str> {
        match self {
            Statistic::Mean { .. } | Statistic::Proportion { .. } => None,
            Statistic::DiffInMeans { group, .. } => Some(group.as_str()),
            Statistic::ChiSquare { explanatory, .. } => Some(explanatory.as_str()),
        }
    }

    /// Check column types and population-level requirements.
    ///
    /// Run once against the observed data, before any resampling: a
    /// proportion's success label must occur somewhere in the population,
    /// both compared groups must exist, and chi-square columns need at least
    /// two categories each.
    pub fn validate(&self, dataset: &Dataset) -> StatsResult<()> {
        if dataset.is_empty() {
            return Err(StatsError::invalid("dataset is empty"));
        }
        match self {
            Statistic::Mean { column } => {
                dataset.numeric(column)?;
            }
            Statistic::Proportion { column, success } => {
                let labels = dataset.categorical(column)?;
                if !labels.iter().any(|l| l == success) {
                    return Err(StatsError::invalid(format!(
                        "success category '{}' never occurs in '{}'",
                        success, column
                    )));
                }
            }
            Statistic::DiffInMeans {
                response,
                group,
                order,
            } => {
                dataset.numeric(response)?;
                let labels = dataset.categorical(group)?;
                if order.0 == order.1 {
                    return Err(StatsError::invalid("compared groups must differ"));
                }
                for g in [&order.0, &order.1] {
                    if !labels.iter().any(|l| l == g) {
                        return Err(StatsError::invalid(format!(
                            "group '{}' not present in '{}'",
                            g, group
                        )));
                    }
                }
            }
            Statistic::ChiSquare {
                response,
                explanatory,
            } => {
                let table = ContingencyTable::from_columns(dataset, response, explanatory)?;
                if table.row_levels.len() < 2 || table.col_levels.len() < 2 {
                    return Err(StatsError::invalid(format!(
                        "chi-square needs at least 2 categories in '{}' and '{}'",
                        response, explanatory
                    )));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statistic::Mean { column } => write!(f, "mean({})", column),
            Statistic::Proportion { column, success } => {
                write!(f, "prop({} == {})", column, success)
            }
            Statistic::DiffInMeans {
                response,
                group,
                order,
            } => write!(
                f,
                "mean({r} | {g}={a}) - mean({r} | {g}={b})",
                r = response,
                g = group,
                a = order.0,
                b = order.1
            ),
            Statistic::ChiSquare {
                response,
                explanatory,
            } => write!(f, "chisq({} ~ {})", response, explanatory),
        }
    }
}

/// Compute a statistic on a dataset
///
/// # Arguments
/// * `dataset` - Observed or simulated data
/// * `statistic` - Which statistic, with its column bindings
pub fn calculate(dataset: &Dataset, statistic: &Statistic) -> StatsResult<f64> {
    match statistic {
        Statistic::Mean { column } => {
            let values = dataset.numeric(column)?;
            mean(values).ok_or_else(|| StatsError::invalid("cannot take the mean of no rows"))
        }
        Statistic::Proportion { column, success } => {
            let labels = dataset.categorical(column)?;
            if labels.is_empty() {
                return Err(StatsError::invalid("cannot take a proportion of no rows"));
            }
            let hits = labels.iter().filter(|l| *l == success).count();
            Ok(hits as f64 / labels.len() as f64)
        }
        Statistic::DiffInMeans {
            response,
            group,
            order,
        } => {
            let values = dataset.numeric(response)?;
            let labels = dataset.categorical(group)?;
            let group_mean = |name: &str| -> StatsResult<f64> {
                let in_group: Vec<f64> = values
                    .iter()
                    .zip(labels)
                    .filter(|(_, l)| *l == name)
                    .map(|(v, _)| *v)
                    .collect();
                mean(&in_group).ok_or_else(|| {
                    StatsError::invalid(format!("group '{}' of '{}' is empty", name, group))
                })
            };
            Ok(group_mean(&order.0)? - group_mean(&order.1)?)
        }
        Statistic::ChiSquare {
            response,
            explanatory,
        } => ContingencyTable::from_columns(dataset, response, explanatory)?.pearson_statistic(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
