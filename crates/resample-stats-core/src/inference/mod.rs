//! Resampling-based hypothesis testing
//!
//! The pipeline is: specify a [`Hypothesis`], pick a [`Statistic`], build a
//! [`NullDistribution`] by simulating datasets under the null, then compare
//! the observed statistic against it with [`get_p_value`].

pub mod categorical;
pub mod confidence;
pub mod generate;
pub mod hypothesis;
pub mod null_distribution;
pub mod p_value;
pub mod statistic;

pub use categorical::{chisq_test, ContingencyTable};
pub use confidence::{get_confidence_interval, CiMethod, ConfidenceInterval};
pub use generate::{generate, GenerationMode};
pub use hypothesis::{Hypothesis, NullHypothesis};
pub use null_distribution::{
    build_null_distribution, replicate_seeds, CancelToken, Location, NullDistribution,
    NullDistributionOptions,
};
pub use p_value::{get_p_value, Direction, PValueResult};
pub use statistic::{calculate, Statistic};

use crate::data::Dataset;
use crate::errors::StatsResult;

/// Outcome of a resampling test
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Statistic on the observed data
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Alternative hypothesis direction
    pub direction: Direction,
    /// Number of replicates in the null distribution
    pub reps: usize,
    /// Number of observations
    pub n: usize,
    /// Mean of the null distribution
    pub null_mean: f64,
    /// Standard deviation of the null distribution
    pub null_std_dev: f64,
    /// Test method/name
    pub method: String,
}

/// Chi-square test result
#[derive(Debug, Clone)]
pub struct ChiSquareResult {
    /// Chi-square statistic
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub df: usize,
    /// Method name
    pub method: String,
}

/// Run a complete resampling test
///
/// Computes the observed statistic, builds the null distribution and derives
/// the p-value for `direction`.
///
/// # Arguments
/// * `dataset` - Observed data
/// * `hypothesis` - Null hypothesis
/// * `statistic` - Test statistic
/// * `options` - Replicate count, generation mode, seed
/// * `direction` - Tail direction of the alternative
pub fn resampling_test(
    dataset: &Dataset,
    hypothesis: &Hypothesis,
    statistic: &Statistic,
    options: &NullDistributionOptions,
    direction: Direction,
) -> StatsResult<TestResult> {
    let null = build_null_distribution(dataset, hypothesis, statistic, options, None)?;
    let observed = calculate(dataset, statistic)?;
    let p = get_p_value(&null, observed, direction)?;

    Ok(TestResult {
        statistic: observed,
        p_value: p.p_value,
        direction,
        reps: null.len(),
        n: dataset.n_rows(),
        null_mean: null.mean(),
        null_std_dev: null.std_dev(),
        method: format!(
            "Randomization test of {} ({} {} replicates)",
            statistic,
            null.len(),
            null.mode().name()
        ),
    })
}
