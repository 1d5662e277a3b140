/// Core result from model fitting - always computed
#[derive(Debug, Clone)]
pub struct FitResultCore {
    /// Regression coefficients (excluding intercept)
    pub coefficients: Vec<f64>,
    /// Intercept term (if fitted with intercept)
    pub intercept: Option<f64>,
    /// Names of the features, in coefficient order
    pub feature_names: Vec<String>,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Residual sum of squares
    pub rss: f64,
    /// Residual degrees of freedom (n - parameters)
    pub df_residual: usize,
    /// F-statistic for overall model significance
    pub f_statistic: f64,
    /// p-value for F-statistic
    pub f_pvalue: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of features (excluding intercept)
    pub n_features: usize,
}

impl FitResultCore {
    /// Number of estimated parameters, intercept included
    pub fn n_parameters(&self) -> usize {
        self.n_features + usize::from(self.intercept.is_some())
    }
}

/// Inference results - only computed if requested
///
/// Vectors are in parameter order: intercept first (when fitted), then the
/// feature coefficients.
#[derive(Debug, Clone)]
pub struct FitResultInference {
    /// Standard errors of coefficients
    pub std_errors: Vec<f64>,
    /// t-statistics for coefficients
    pub t_values: Vec<f64>,
    /// p-values for coefficients
    pub p_values: Vec<f64>,
    /// Lower bound of confidence intervals
    pub ci_lower: Vec<f64>,
    /// Upper bound of confidence intervals
    pub ci_upper: Vec<f64>,
    /// Confidence level used (e.g., 0.95)
    pub confidence_level: f64,
    /// Covariance estimator behind the standard errors
    pub covariance: CovarianceType,
}

/// Per-observation output of a fit
#[derive(Debug, Clone)]
pub struct FitResultDiagnostics {
    /// Residuals
    pub residuals: Vec<f64>,
    /// Fitted values
    pub fitted: Vec<f64>,
    /// Leverage values (hat diagonal)
    pub leverage: Vec<f64>,
}

/// Combined fit result
#[derive(Debug, Clone)]
pub struct FitResult {
    pub core: FitResultCore,
    pub inference: Option<FitResultInference>,
    pub diagnostics: FitResultDiagnostics,
}

/// Coefficient covariance estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceType {
    /// Homoskedastic: s^2 (X'X)^-1
    #[default]
    Classical,
    /// White's heteroskedasticity-consistent estimator
    HC0,
    /// HC0 scaled by n / (n - p)
    HC1,
    /// Squared residuals inflated by 1 / (1 - h_ii)^2
    HC3,
}

impl CovarianceType {
    pub fn name(&self) -> &'static str {
        match self {
            CovarianceType::Classical => "classical",
            CovarianceType::HC0 => "HC0",
            CovarianceType::HC1 => "HC1",
            CovarianceType::HC3 => "HC3",
        }
    }
}

impl std::str::FromStr for CovarianceType {
    type Err = crate::StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classical" | "nonrobust" => Ok(CovarianceType::Classical),
            "hc0" => Ok(CovarianceType::HC0),
            "hc1" => Ok(CovarianceType::HC1),
            "hc3" => Ok(CovarianceType::HC3),
            other => Err(crate::StatsError::InvalidInput(format!(
                "unknown covariance type '{}'",
                other
            ))),
        }
    }
}

/// Options for OLS fitting
#[derive(Debug, Clone)]
pub struct OlsOptions {
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
    /// Whether to compute inference statistics (std errors, p-values, etc.)
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95)
    pub confidence_level: f64,
    /// Covariance estimator for standard errors
    pub covariance: CovarianceType,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            compute_inference: false,
            confidence_level: 0.95,
            covariance: CovarianceType::Classical,
        }
    }
}
