//! Nested model comparison (ANOVA F-test)

use crate::errors::{StatsError, StatsResult};
use crate::types::FitResult;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Result of comparing a restricted model against a larger one
#[derive(Debug, Clone)]
pub struct AnovaComparison {
    /// Residual degrees of freedom of the restricted model
    pub df_restricted: usize,
    /// Residual degrees of freedom of the full model
    pub df_full: usize,
    /// RSS of the restricted model
    pub rss_restricted: f64,
    /// RSS of the full model
    pub rss_full: f64,
    /// Number of added parameters
    pub df_diff: usize,
    /// Reduction in RSS from the added parameters
    pub ss_diff: f64,
    /// F statistic
    pub f_statistic: f64,
    /// p-value
    pub p_value: f64,
}

/// Compare two nested OLS fits on the same observations
///
/// # Arguments
/// * `restricted` - Smaller model
/// * `full` - Larger model containing every term of `restricted`
pub fn anova_compare(restricted: &FitResult, full: &FitResult) -> StatsResult<AnovaComparison> {
    let r = &restricted.core;
    let f = &full.core;

    if r.n_observations != f.n_observations {
        return Err(StatsError::DimensionMismatchMsg(format!(
            "models were fitted on {} and {} observations",
            r.n_observations, f.n_observations
        )));
    }
    if f.n_parameters() <= r.n_parameters() {
        return Err(StatsError::InvalidInput(format!(
            "full model has {} parameters, restricted has {}; the full model must be larger",
            f.n_parameters(),
            r.n_parameters()
        )));
    }
    if f.df_residual == 0 {
        return Err(StatsError::InsufficientDataMsg(
            "full model has no residual degrees of freedom".into(),
        ));
    }

    let df_diff = f.n_parameters() - r.n_parameters();
    let ss_diff = r.rss - f.rss;
    let f_statistic = (ss_diff / df_diff as f64) / (f.rss / f.df_residual as f64);
    let p_value = FisherSnedecor::new(df_diff as f64, f.df_residual as f64)
        .map(|d| d.sf(f_statistic))
        .unwrap_or(f64::NAN);

    Ok(AnovaComparison {
        df_restricted: r.df_residual,
        df_full: f.df_residual,
        rss_restricted: r.rss,
        rss_full: f.rss,
        df_diff,
        ss_diff,
        f_statistic,
        p_value,
    })
}
