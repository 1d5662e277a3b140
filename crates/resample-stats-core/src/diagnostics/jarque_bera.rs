//! Jarque-Bera test for normality of regression residuals
//!
//! Checks whether residual skewness and excess kurtosis are consistent with
//! normally distributed errors.

use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of Jarque-Bera test
#[derive(Debug, Clone)]
pub struct JarqueBeraResult {
    /// JB test statistic
    pub statistic: f64,
    /// p-value from chi-squared(2)
    pub p_value: f64,
    /// Sample skewness
    pub skewness: f64,
    /// Sample kurtosis (excess)
    pub kurtosis: f64,
    /// Number of observations
    pub n: usize,
}

/// Compute the Jarque-Bera statistic, JB = n/6 * (S^2 + K^2/4)
///
/// Non-finite values are ignored.
pub fn jarque_bera(data: &[f64]) -> StatsResult<JarqueBeraResult> {
    let clean: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    let n = clean.len();

    if n < 3 {
        return Err(StatsError::InsufficientDataMsg(
            "Jarque-Bera test requires at least 3 observations".into(),
        ));
    }

    let mean = clean.iter().sum::<f64>() / n as f64;
    let (m2, m3, m4) = clean.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &x| {
        let d = x - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    });
    let (m2, m3, m4) = (m2 / n as f64, m3 / n as f64, m4 / n as f64);

    if m2 <= 0.0 {
        return Err(StatsError::InvalidInput("Data has zero variance".into()));
    }

    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2) - 3.0;
    let statistic = (n as f64 / 6.0) * (skewness * skewness + kurtosis * kurtosis / 4.0);

    let p_value = ChiSquared::new(2.0)
        .map_err(|e| StatsError::InvalidInput(format!("chi-square distribution: {}", e)))?
        .sf(statistic);

    Ok(JarqueBeraResult {
        statistic,
        p_value,
        skewness,
        kurtosis,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_residuals() {
        let data: Vec<f64> = vec![
            -1.0, -0.5, 0.0, 0.5, 1.0, -0.8, -0.3, 0.2, 0.7, 1.2, -1.2, -0.7, -0.2, 0.3, 0.8, -0.9,
            -0.4, 0.1, 0.6, 1.1,
        ];

        let result = jarque_bera(&data).unwrap();
        assert!(result.statistic >= 0.0);
        assert!(result.p_value > 0.05);
        // chi-squared(2) survival function is exp(-x/2)
        assert!((result.p_value - (-result.statistic / 2.0).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_skewed_residuals() {
        let data: Vec<f64> = vec![
            1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0, 20.0,
            50.0,
        ];

        let result = jarque_bera(&data).unwrap();
        assert!(result.skewness > 1.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_insufficient_data() {
        assert!(jarque_bera(&[1.0, 2.0]).is_err());
        assert!(jarque_bera(&[2.0, 2.0, 2.0]).is_err());
    }

    #[test]
    fn test_ignores_nan() {
        let data = vec![1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0, 5.0];
        let result = jarque_bera(&data).unwrap();
        assert_eq!(result.n, 5);
    }
}
