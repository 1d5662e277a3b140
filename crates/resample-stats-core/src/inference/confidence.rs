//! Confidence intervals from a bootstrap distribution

use super::null_distribution::NullDistribution;
use crate::data::summary::quantile_sorted;
use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Interval construction method
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CiMethod {
    /// Quantiles of the replicate values
    Percentile,
    /// `point ± z * sd(replicates)`
    StandardError { point: f64 },
}

/// Confidence interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

/// Confidence interval from a bootstrap distribution
///
/// # Arguments
/// * `dist` - Bootstrap distribution of the statistic
/// * `level` - Confidence level in (0, 1)
/// * `method` - Percentile or standard-error interval
pub fn get_confidence_interval(
    dist: &NullDistribution,
    level: f64,
    method: CiMethod,
) -> StatsResult<ConfidenceInterval> {
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::invalid(format!(
            "confidence level {} must be in (0, 1)",
            level
        )));
    }
    if dist.is_empty() {
        return Err(StatsError::invalid("bootstrap distribution is empty"));
    }

    let alpha = 1.0 - level;
    let (lower, upper) = match method {
        CiMethod::Percentile => {
            let mut sorted = dist.values().to_vec();
            sorted.sort_by(f64::total_cmp);
            (
                quantile_sorted(&sorted, alpha / 2.0),
                quantile_sorted(&sorted, 1.0 - alpha / 2.0),
            )
        }
        CiMethod::StandardError { point } => {
            if dist.len() < 2 {
                return Err(StatsError::InsufficientDataMsg(
                    "standard error interval requires at least 2 replicates".into(),
                ));
            }
            let normal = Normal::new(0.0, 1.0)
                .map_err(|e| StatsError::invalid(format!("normal distribution: {}", e)))?;
            let z = normal.inverse_cdf(1.0 - alpha / 2.0);
            let se = dist.std_dev();
            (point - z * se, point + z * se)
        }
    };

    Ok(ConfidenceInterval {
        lower,
        upper,
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::generate::GenerationMode;
    use crate::inference::statistic::Statistic;

    fn replicates() -> NullDistribution {
        NullDistribution::from_values(
            (0..=100).map(f64::from).collect(),
            Statistic::mean("price"),
            GenerationMode::Bootstrap,
            None,
        )
    }

    #[test]
    fn test_percentile_interval() {
        let ci = get_confidence_interval(&replicates(), 0.9, CiMethod::Percentile).unwrap();
        assert!((ci.lower - 5.0).abs() < 1e-9);
        assert!((ci.upper - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_standard_error_interval() {
        let dist = replicates();
        let ci = get_confidence_interval(&dist, 0.95, CiMethod::StandardError { point: 50.0 })
            .unwrap();
        let half_width = 1.959964 * dist.std_dev();
        assert!((ci.lower - (50.0 - half_width)).abs() < 1e-3);
        assert!((ci.upper - (50.0 + half_width)).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_level() {
        assert!(get_confidence_interval(&replicates(), 1.0, CiMethod::Percentile).is_err());
        assert!(get_confidence_interval(&replicates(), 0.0, CiMethod::Percentile).is_err());
    }
}
