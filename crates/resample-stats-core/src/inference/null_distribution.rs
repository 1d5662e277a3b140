//! Null distribution builder
//!
//! Repeatedly simulates a dataset under the null and computes the statistic
//! on it. Every replicate gets its own RNG seeded from a master seed, so the
//! output is identical whether replicates run sequentially or on the rayon
//! pool.

use super::generate::{generate, GenerationMode};
use super::hypothesis::{Hypothesis, NullHypothesis};
use super::statistic::{calculate, Statistic};
use crate::data::Dataset;
use crate::errors::{StatsError, StatsResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Options for building a null distribution
#[derive(Debug, Clone)]
pub struct NullDistributionOptions {
    /// Number of replicates
    pub reps: usize,
    /// Generation mode; picked from the hypothesis when `None`
    pub mode: Option<GenerationMode>,
    /// Optional seed for reproducibility
    pub seed: Option<u64>,
    /// Run replicates on the rayon thread pool
    pub parallel: bool,
}

impl Default for NullDistributionOptions {
    fn default() -> Self {
        Self {
            reps: 1000,
            mode: None,
            seed: None,
            parallel: true,
        }
    }
}

/// Cooperative cancellation flag shared with a running build
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Where a point-null bootstrap distribution sits relative to the null value
///
/// Bootstrap resamples are not shifted to the hypothesised value; they are
/// centred on the observed data. The p-value engine uses `center` to measure
/// distances within the distribution and `hypothesized` for the observed
/// statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub hypothesized: f64,
    pub center: f64,
}

/// Sampling distribution of a statistic under the null
#[derive(Debug, Clone, PartialEq)]
pub struct NullDistribution {
    values: Vec<f64>,
    statistic: Statistic,
    mode: GenerationMode,
    location: Option<Location>,
}

impl NullDistribution {
    /// Wrap precomputed replicate values
    pub fn from_values(
        values: Vec<f64>,
        statistic: Statistic,
        mode: GenerationMode,
        location: Option<Location>,
    ) -> Self {
        Self {
            values,
            statistic,
            mode,
            location,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn statistic(&self) -> &Statistic {
        &self.statistic
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Mean of the replicate values (NaN when empty)
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation of the replicate values
    pub fn std_dev(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = self.mean();
        let variance = self.values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }
}

/// Per-replicate seeds derived from a master seed (or from entropy)
pub fn replicate_seeds(seed: Option<u64>, reps: usize) -> Vec<u64> {
    let mut master = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    (0..reps).map(|_| master.gen::<u64>()).collect()
}

/// Check that the statistic is about the hypothesis's columns and fits its null
fn check_pairing(hypothesis: &Hypothesis, statistic: &Statistic) -> StatsResult<()> {
    if statistic.response() != hypothesis.response {
        return Err(StatsError::invalid(format!(
            "statistic is on '{}' but the hypothesis is about '{}'",
            statistic.response(),
            hypothesis.response
        )));
    }

    match (&hypothesis.null, statistic) {
        (NullHypothesis::Point { .. }, Statistic::Mean { .. }) => Ok(()),
        (NullHypothesis::Point { .. }, Statistic::Proportion { success, .. }) => {
            match &hypothesis.success {
                Some(s) if s != success => Err(StatsError::invalid(format!(
                    "hypothesis success '{}' differs from statistic success '{}'",
                    s, success
                ))),
                _ => Ok(()),
            }
        }
        (NullHypothesis::Independence, Statistic::DiffInMeans { .. })
        | (NullHypothesis::Independence, Statistic::ChiSquare { .. }) => {
            if statistic.explanatory() != hypothesis.explanatory.as_deref() {
                return Err(StatsError::invalid(format!(
                    "statistic groups by '{}' but the hypothesis explanatory column is '{}'",
                    statistic.explanatory().unwrap_or_default(),
                    hypothesis.explanatory.as_deref().unwrap_or_default()
                )));
            }
            Ok(())
        }
        (NullHypothesis::Point { .. }, other) | (NullHypothesis::Independence, other) => {
            Err(StatsError::invalid(format!(
                "a {} statistic does not fit a {} null",
                other.name(),
                match hypothesis.null {
                    NullHypothesis::Point { .. } => "point",
                    NullHypothesis::Independence => "independence",
                }
            )))
        }
    }
}

/// Build the null distribution of `statistic` under `hypothesis`
///
/// All validation happens before the first replicate is generated.
///
/// # Arguments
/// * `dataset` - Observed data, shared read-only by all replicates
/// * `hypothesis` - Null hypothesis to simulate under
/// * `statistic` - Statistic computed on each simulated dataset
/// * `options` - Replicate count, mode, seed, parallelism
/// * `cancel` - Optional cancellation flag checked before each replicate
pub fn build_null_distribution(
    dataset: &Dataset,
    hypothesis: &Hypothesis,
    statistic: &Statistic,
    options: &NullDistributionOptions,
    cancel: Option<&CancelToken>,
) -> StatsResult<NullDistribution> {
    if options.reps < 1 {
        return Err(StatsError::invalid(format!(
            "replicate count must be at least 1, got {}",
            options.reps
        )));
    }
    hypothesis.validate(dataset)?;
    statistic.validate(dataset)?;
    check_pairing(hypothesis, statistic)?;

    let mode = options
        .mode
        .unwrap_or_else(|| GenerationMode::default_for(hypothesis));
    mode.check(hypothesis)?;

    let started = Instant::now();
    let seeds = replicate_seeds(options.seed, options.reps);

    let replicate = |seed: u64| -> StatsResult<f64> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(StatsError::Cancelled);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let simulated = generate(dataset, hypothesis, mode, &mut rng)?;
        calculate(&simulated, statistic)
    };

    let values: Vec<f64> = if options.parallel {
        seeds.par_iter().map(|&s| replicate(s)).collect::<StatsResult<_>>()?
    } else {
        seeds.iter().map(|&s| replicate(s)).collect::<StatsResult<_>>()?
    };

    let location = match (mode, hypothesis.point_value()) {
        (GenerationMode::Bootstrap, Some(hypothesized)) => Some(Location {
            hypothesized,
            center: values.iter().sum::<f64>() / values.len() as f64,
        }),
        _ => None,
    };

    tracing::debug!(
        statistic = %statistic,
        mode = mode.name(),
        reps = options.reps,
        parallel = options.parallel,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "built null distribution"
    );

    Ok(NullDistribution {
        values,
        statistic: statistic.clone(),
        mode,
        location,
    })
}
