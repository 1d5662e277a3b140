//! Variance Inflation Factor (VIF)
//!
//! For feature j, regress it on the remaining features:
//! VIF_j = 1 / (1 - R^2_j). Values above 5-10 indicate the coefficient's
//! variance is inflated by collinearity with the other regressors.

use crate::errors::{StatsError, StatsResult};
use crate::models::{fit_ols, Design};
use crate::types::OlsOptions;

/// VIF per feature of a design, paired with the feature name
pub fn compute_vif(design: &Design) -> StatsResult<Vec<(String, f64)>> {
    let x = &design.x;
    if x.is_empty() {
        return Err(StatsError::InvalidInput("No features provided".into()));
    }
    if x.len() != design.feature_names.len() {
        return Err(StatsError::DimensionMismatchMsg(format!(
            "{} feature columns but {} names",
            x.len(),
            design.feature_names.len()
        )));
    }
    if x.len() == 1 {
        return Ok(vec![(design.feature_names[0].clone(), 1.0)]);
    }

    x.iter()
        .enumerate()
        .map(|(j, target)| {
            let others: Vec<Vec<f64>> = x
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != j)
                .map(|(_, col)| col.clone())
                .collect();

            let vif = match fit_ols(target, &others, &OlsOptions::default()) {
                Ok(fit) if fit.core.r_squared < 1.0 - 1e-12 => {
                    1.0 / (1.0 - fit.core.r_squared.max(0.0))
                }
                Ok(_) | Err(StatsError::SingularMatrix) => f64::INFINITY,
                Err(e) => return Err(e),
            };
            Ok((design.feature_names[j].clone(), vif))
        })
        .collect()
}
