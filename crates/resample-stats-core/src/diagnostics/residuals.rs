//! Residual summaries for fitted regression models

use crate::errors::{StatsError, StatsResult};
use crate::types::FitResult;

/// Residuals of a fit in several scalings
#[derive(Debug, Clone)]
pub struct ResidualsResult {
    /// Raw residuals: e = y - y_hat
    pub raw: Vec<f64>,
    /// Standardized residuals: e / s
    pub standardized: Vec<f64>,
    /// Internally studentized residuals: e / (s * sqrt(1 - h_ii))
    pub studentized: Vec<f64>,
    /// Leverage values (hat diagonal)
    pub leverage: Vec<f64>,
}

impl ResidualsResult {
    /// Indices of observations whose studentized residual exceeds `threshold`
    /// in absolute value
    pub fn outliers(&self, threshold: f64) -> Vec<usize> {
        self.studentized
            .iter()
            .enumerate()
            .filter(|(_, r)| r.abs() > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Compute standardized and studentized residuals from a fit
pub fn compute_residuals(fit: &FitResult) -> StatsResult<ResidualsResult> {
    let raw = fit.diagnostics.residuals.clone();
    let leverage = fit.diagnostics.leverage.clone();

    if raw.is_empty() {
        return Err(StatsError::InvalidInput("Fit has no residuals".into()));
    }
    if leverage.len() != raw.len() {
        return Err(StatsError::DimensionMismatchMsg(format!(
            "{} residuals but {} leverage values",
            raw.len(),
            leverage.len()
        )));
    }

    let s = fit.core.residual_std_error;
    let scale = |e: f64, denom: f64| if denom > 0.0 { e / denom } else { e };

    let standardized = raw.iter().map(|&e| scale(e, s)).collect();
    let studentized = raw
        .iter()
        .zip(&leverage)
        .map(|(&e, h)| scale(e, s * (1.0 - h).max(1e-10).sqrt()))
        .collect();

    Ok(ResidualsResult {
        raw,
        standardized,
        studentized,
        leverage,
    })
}
