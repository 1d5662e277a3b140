//! Breusch-Pagan test for heteroskedasticity
//!
//! Regresses the squared residuals on the model features. Uses Koenker's
//! studentised form, LM = n * R^2 of the auxiliary regression, which does not
//! assume normal errors.

use crate::errors::{StatsError, StatsResult};
use crate::models::fit_ols;
use crate::types::OlsOptions;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of the Breusch-Pagan test
#[derive(Debug, Clone)]
pub struct BreuschPaganResult {
    /// Lagrange multiplier statistic
    pub lm_statistic: f64,
    /// p-value from chi-squared(df)
    pub p_value: f64,
    /// Degrees of freedom (number of features)
    pub df: usize,
    /// R-squared of the auxiliary regression
    pub auxiliary_r_squared: f64,
}

/// Breusch-Pagan (Koenker) test
///
/// # Arguments
/// * `residuals` - Residuals from the fitted model
/// * `x` - Feature columns of that model (intercept excluded)
pub fn breusch_pagan(residuals: &[f64], x: &[Vec<f64>]) -> StatsResult<BreuschPaganResult> {
    if residuals.is_empty() {
        return Err(StatsError::EmptyInput { field: "residuals" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }

    let squared: Vec<f64> = residuals.iter().map(|e| e * e).collect();
    let auxiliary = fit_ols(&squared, x, &OlsOptions::default())?;

    let n = auxiliary.core.n_observations;
    let df = x.len();
    // A constant squared residual has zero total variance: nothing to explain
    let r_squared = if auxiliary.core.r_squared.is_nan() {
        0.0
    } else {
        auxiliary.core.r_squared
    };
    let lm_statistic = n as f64 * r_squared;
    let p_value = ChiSquared::new(df as f64)
        .map_err(|e| StatsError::InvalidInput(format!("chi-square distribution: {}", e)))?
        .sf(lm_statistic);

    Ok(BreuschPaganResult {
        lm_statistic,
        p_value,
        df,
        auxiliary_r_squared: r_squared,
    })
}
