//! Ordinary Least Squares (OLS) regression

use crate::errors::{StatsError, StatsResult};
use crate::linalg::{design_matrix, LeastSquares};
use crate::types::{
    CovarianceType, FitResult, FitResultCore, FitResultDiagnostics, FitResultInference, OlsOptions,
};
use faer::Mat;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Fit an OLS regression model
///
/// # Arguments
/// * `y` - Response variable (n observations)
/// * `x` - Feature matrix, one `Vec` per feature (p features x n observations)
/// * `options` - Fitting options
///
/// # Returns
/// * `FitResult` containing coefficients, R-squared, residuals, and optionally
///   inference statistics under the requested covariance estimator
pub fn fit_ols(y: &[f64], x: &[Vec<f64>], options: &OlsOptions) -> StatsResult<FitResult> {
    // Validate inputs
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }

    let n_obs = y.len();
    let n_features = x.len();

    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let min_obs = if options.fit_intercept {
        n_features + 1
    } else {
        n_features
    };
    if n_obs <= min_obs {
        return Err(StatsError::InsufficientData {
            rows: n_obs,
            cols: n_features,
        });
    }

    // Filter out rows with NaN values
    let valid_indices: Vec<usize> = (0..n_obs)
        .filter(|&i| y[i].is_finite() && x.iter().all(|col| col[i].is_finite()))
        .collect();

    let n_valid = valid_indices.len();
    if n_valid <= min_obs {
        return Err(StatsError::InsufficientData {
            rows: n_valid,
            cols: n_features,
        });
    }

    let y_valid: Vec<f64> = valid_indices.iter().map(|&i| y[i]).collect();

    // Thin QR of the equilibrated design
    let ls = LeastSquares::factor(design_matrix(x, &valid_indices, options.fit_intercept))
        .ok_or(StatsError::SingularMatrix)?;
    let n_params = ls.n_params();
    let beta = ls.solve(&y_valid);

    let fitted = ls.predict(&beta);
    let residuals: Vec<f64> = y_valid.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();

    let rss: f64 = residuals.iter().map(|e| e * e).sum();
    let tss: f64 = if options.fit_intercept {
        let mean = y_valid.iter().sum::<f64>() / n_valid as f64;
        y_valid.iter().map(|v| (v - mean).powi(2)).sum()
    } else {
        y_valid.iter().map(|v| v * v).sum()
    };

    let df_residual = n_valid - n_params;
    let sigma2 = rss / df_residual as f64;
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
    let df_model = n_params - usize::from(options.fit_intercept);
    let adj_r_squared = if options.fit_intercept {
        1.0 - (1.0 - r_squared) * (n_valid - 1) as f64 / df_residual as f64
    } else {
        1.0 - (1.0 - r_squared) * n_valid as f64 / df_residual as f64
    };

    let (f_statistic, f_pvalue) = if df_model > 0 && sigma2 > 0.0 {
        let f = ((tss - rss) / df_model as f64) / sigma2;
        let p = FisherSnedecor::new(df_model as f64, df_residual as f64)
            .map(|d| d.sf(f))
            .unwrap_or(f64::NAN);
        (f, p)
    } else {
        (f64::NAN, f64::NAN)
    };

    let lev = ls.leverage();

    let inference = if options.compute_inference {
        Some(compute_inference(
            &beta,
            &ls,
            &residuals,
            &lev,
            sigma2,
            df_residual,
            options,
        )?)
    } else {
        None
    };

    let (intercept, coefficients) = if options.fit_intercept {
        (Some(beta[0]), beta[1..].to_vec())
    } else {
        (None, beta)
    };

    tracing::debug!(
        n = n_valid,
        features = n_features,
        r_squared,
        covariance = options.covariance.name(),
        "fitted OLS model"
    );

    Ok(FitResult {
        core: FitResultCore {
            coefficients,
            intercept,
            feature_names: (0..n_features).map(|j| format!("x{}", j + 1)).collect(),
            r_squared,
            adj_r_squared,
            residual_std_error: sigma2.sqrt(),
            rss,
            df_residual,
            f_statistic,
            f_pvalue,
            n_observations: n_valid,
            n_features,
        },
        inference,
        diagnostics: FitResultDiagnostics {
            residuals,
            fitted,
            leverage: lev,
        },
    })
}

/// Coefficient covariance under the chosen estimator
///
/// Classical: s^2 (X'X)^-1. Sandwich estimators: (X'X)^-1 X' diag(w) X (X'X)^-1
/// with weights from the squared residuals.
fn coefficient_covariance(
    ls: &LeastSquares,
    residuals: &[f64],
    leverage: &[f64],
    sigma2: f64,
    covariance: CovarianceType,
) -> Mat<f64> {
    let p = ls.n_params();
    let n = residuals.len();

    let weights: Vec<f64> = match covariance {
        CovarianceType::Classical => {
            let inv = ls.xtx_inverse();
            return Mat::from_fn(p, p, |j, l| sigma2 * inv[(j, l)]);
        }
        CovarianceType::HC0 => residuals.iter().map(|e| e * e).collect(),
        CovarianceType::HC1 => {
            let scale = n as f64 / (n - p) as f64;
            residuals.iter().map(|e| e * e * scale).collect()
        }
        CovarianceType::HC3 => residuals
            .iter()
            .zip(leverage)
            .map(|(e, h)| e * e / (1.0 - h).max(1e-10).powi(2))
            .collect(),
    };
    ls.sandwich(&weights)
}

fn compute_inference(
    beta: &[f64],
    ls: &LeastSquares,
    residuals: &[f64],
    leverage: &[f64],
    sigma2: f64,
    df_residual: usize,
    options: &OlsOptions,
) -> StatsResult<FitResultInference> {
    if !(options.confidence_level > 0.0 && options.confidence_level < 1.0) {
        return Err(StatsError::InvalidInput(format!(
            "confidence level {} must be in (0, 1)",
            options.confidence_level
        )));
    }

    let cov = coefficient_covariance(ls, residuals, leverage, sigma2, options.covariance);
    let t_dist = StudentsT::new(0.0, 1.0, df_residual as f64)
        .map_err(|e| StatsError::InvalidInput(format!("t distribution: {}", e)))?;
    let t_crit = t_dist.inverse_cdf((1.0 + options.confidence_level) / 2.0);

    let std_errors: Vec<f64> = (0..beta.len()).map(|j| cov[(j, j)].max(0.0).sqrt()).collect();
    let t_values: Vec<f64> = beta.iter().zip(&std_errors).map(|(b, se)| b / se).collect();
    let p_values: Vec<f64> = t_values
        .iter()
        .map(|t| {
            if t.is_finite() {
                2.0 * t_dist.sf(t.abs())
            } else {
                f64::NAN
            }
        })
        .collect();
    let ci_lower = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b - t_crit * se)
        .collect();
    let ci_upper = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b + t_crit * se)
        .collect();

    Ok(FitResultInference {
        std_errors,
        t_values,
        p_values,
        ci_lower,
        ci_upper,
        confidence_level: options.confidence_level,
        covariance: options.covariance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ols() {
        // Simple linear relationship: y = 2*x + 1
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let y = vec![3.0, 5.0, 7.0, 9.0, 11.0];

        let result = fit_ols(&y, &x, &OlsOptions::default()).unwrap();

        assert!((result.core.coefficients[0] - 2.0).abs() < 1e-10);
        assert!((result.core.intercept.unwrap() - 1.0).abs() < 1e-10);
        assert!(result.core.r_squared > 0.9999);
        assert_eq!(result.core.df_residual, 3);
        assert!(result.inference.is_none());
    }

    #[test]
    fn test_ols_with_inference() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]];
        let y = vec![2.1, 4.0, 5.9, 8.1, 10.0, 11.9, 14.1, 16.0, 17.9, 20.1];

        let options = OlsOptions {
            compute_inference: true,
            ..Default::default()
        };
        let result = fit_ols(&y, &x, &options).unwrap();
        let inference = result.inference.unwrap();

        // Intercept first, then slope
        assert_eq!(inference.std_errors.len(), 2);
        assert!(inference.p_values[1] < 0.05);
        assert!(inference.ci_lower[1] < 2.0 && inference.ci_upper[1] > 1.9);
        assert!(result.core.f_pvalue < 0.05);
    }

    #[test]
    fn test_classical_standard_error_by_hand() {
        // Slope SE = s / sqrt(Sxx)
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let options = OlsOptions {
            compute_inference: true,
            ..Default::default()
        };
        let result = fit_ols(&y, &x, &options).unwrap();

        // slope = 0.8, intercept = 0.6, RSS = 3.6, Sxx = 10
        assert!((result.core.coefficients[0] - 0.8).abs() < 1e-10);
        assert!((result.core.rss - 3.6).abs() < 1e-10);
        let s = (3.6_f64 / 3.0).sqrt();
        let se = result.inference.unwrap().std_errors[1];
        assert!((se - s / 10.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_hc0_standard_error_by_hand() {
        // Slope HC0 variance = sum((x - xbar)^2 e^2) / Sxx^2
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let options = OlsOptions {
            compute_inference: true,
            covariance: CovarianceType::HC0,
            ..Default::default()
        };
        let result = fit_ols(&y, &x, &options).unwrap();

        let residuals = &result.diagnostics.residuals;
        let numerator: f64 = x[0]
            .iter()
            .zip(residuals)
            .map(|(xi, e)| (xi - 3.0).powi(2) * e * e)
            .sum();
        let expected = (numerator / 100.0).sqrt();
        let se = result.inference.unwrap().std_errors[1];
        assert!((se - expected).abs() < 1e-10);
    }

    #[test]
    fn test_hc_ordering() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]];
        let y = vec![1.0, 2.5, 2.0, 5.0, 3.5, 7.5, 5.0, 10.0];
        let se_for = |covariance| {
            let options = OlsOptions {
                compute_inference: true,
                covariance,
                ..Default::default()
            };
            fit_ols(&y, &x, &options).unwrap().inference.unwrap().std_errors[1]
        };
        let hc0 = se_for(CovarianceType::HC0);
        let hc1 = se_for(CovarianceType::HC1);
        let hc3 = se_for(CovarianceType::HC3);
        assert!(hc1 > hc0);
        assert!(hc3 > hc0);
    }

    #[test]
    fn test_ols_dimension_mismatch() {
        let x = vec![vec![1.0, 2.0, 3.0]];
        let y = vec![1.0, 2.0]; // Wrong length

        let result = fit_ols(&y, &x, &OlsOptions::default());
        assert!(matches!(result, Err(StatsError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_ols_insufficient_data() {
        let x = vec![vec![1.0, 2.0]]; // Only 2 observations
        let y = vec![1.0, 2.0];

        let result = fit_ols(&y, &x, &OlsOptions::default());
        assert!(matches!(result, Err(StatsError::InsufficientData { .. })));
    }

    #[test]
    fn test_ols_collinear_features() {
        let x = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0],
        ];
        let y = vec![1.0, 2.0, 3.0, 4.0, 6.0];
        let result = fit_ols(&y, &x, &OlsOptions::default());
        assert!(matches!(result, Err(StatsError::SingularMatrix)));
    }

    #[test]
    fn test_regressors_on_very_different_scales() {
        // A price-scale column next to a unit-interval one, full rank
        let big: Vec<f64> = (0..100).map(|k| 1e6 + 1e4 * k as f64).collect();
        let small: Vec<f64> = (0..100).map(|k| (k % 17) as f64 / 17.0).collect();
        let y: Vec<f64> = big
            .iter()
            .zip(&small)
            .map(|(b, s)| 5.0 + 2e-6 * b + 3.0 * s)
            .collect();

        let options = OlsOptions {
            compute_inference: true,
            covariance: CovarianceType::HC3,
            ..Default::default()
        };
        let result = fit_ols(&y, &[big, small], &options).unwrap();

        assert!((result.core.intercept.unwrap() - 5.0).abs() < 1e-6);
        assert!((result.core.coefficients[0] - 2e-6).abs() < 1e-12);
        assert!((result.core.coefficients[1] - 3.0).abs() < 1e-6);
        assert!(result.core.r_squared > 0.999_999);
        let inference = result.inference.unwrap();
        assert!(inference.std_errors.iter().all(|se| se.is_finite()));
    }

    #[test]
    fn test_rescaling_a_column_rescales_its_coefficient() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let x2 = vec![0.3, 0.1, 0.4, 0.1, 0.5, 0.9, 0.2];
        let y = vec![2.0, 2.9, 4.4, 4.8, 6.3, 7.9, 8.1];
        let base = fit_ols(&y, &[x1.clone(), x2.clone()], &OlsOptions::default()).unwrap();

        let x1_cents: Vec<f64> = x1.iter().map(|v| v * 1e8).collect();
        let scaled = fit_ols(&y, &[x1_cents, x2], &OlsOptions::default()).unwrap();

        let ratio = base.core.coefficients[0] / scaled.core.coefficients[0];
        assert!((ratio / 1e8 - 1.0).abs() < 1e-8);
        assert!((base.core.rss - scaled.core.rss).abs() < 1e-9);
    }

    #[test]
    fn test_ols_skips_nan_rows() {
        let x = vec![vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]];
        let y = vec![3.0, 5.0, 100.0, 9.0, 11.0, 13.0];
        let result = fit_ols(&y, &x, &OlsOptions::default()).unwrap();
        assert_eq!(result.core.n_observations, 5);
        assert!((result.core.coefficients[0] - 2.0).abs() < 1e-10);
    }
}
