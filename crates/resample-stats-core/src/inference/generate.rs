//! Null-data generators
//!
//! - Bootstrap: resample rows with replacement
//! - Permute: shuffle the explanatory column across rows
//! - Draw: simulate a categorical response from the hypothesised proportion

use super::hypothesis::{Hypothesis, NullHypothesis};
use crate::data::{Column, Dataset};
use crate::errors::{StatsError, StatsResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// How a simulated dataset is produced under the null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Bootstrap,
    Permute,
    Draw,
}

impl GenerationMode {
    /// Natural mode for a hypothesis: permutation for independence, draws for
    /// a point null on a proportion, bootstrap for any other point null
    pub fn default_for(hypothesis: &Hypothesis) -> Self {
        match (&hypothesis.null, &hypothesis.success) {
            (NullHypothesis::Independence, _) => GenerationMode::Permute,
            (NullHypothesis::Point { .. }, Some(_)) => GenerationMode::Draw,
            (NullHypothesis::Point { .. }, None) => GenerationMode::Bootstrap,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenerationMode::Bootstrap => "bootstrap",
            GenerationMode::Permute => "permute",
            GenerationMode::Draw => "draw",
        }
    }

    /// Check that the mode can simulate the given null
    pub fn check(&self, hypothesis: &Hypothesis) -> StatsResult<()> {
        match (self, &hypothesis.null) {
            (GenerationMode::Permute, NullHypothesis::Independence) => {
                if hypothesis.explanatory.is_none() {
                    return Err(StatsError::invalid(
                        "permutation needs an explanatory column to shuffle",
                    ));
                }
                Ok(())
            }
            (GenerationMode::Bootstrap, NullHypothesis::Point { .. }) => Ok(()),
            (GenerationMode::Draw, NullHypothesis::Point { value }) => {
                if hypothesis.success.is_none() {
                    return Err(StatsError::invalid("draw mode needs a success category"));
                }
                if !(0.0..=1.0).contains(value) {
                    return Err(StatsError::invalid(format!(
                        "hypothesised proportion {} is outside [0, 1]",
                        value
                    )));
                }
                Ok(())
            }
            (mode, null) => Err(StatsError::invalid(format!(
                "{} generation cannot simulate a {} null",
                mode.name(),
                match null {
                    NullHypothesis::Point { .. } => "point",
                    NullHypothesis::Independence => "independence",
                }
            ))),
        }
    }
}

impl std::str::FromStr for GenerationMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bootstrap" => Ok(GenerationMode::Bootstrap),
            "permute" | "permutation" => Ok(GenerationMode::Permute),
            "draw" | "simulate" => Ok(GenerationMode::Draw),
            other => Err(StatsError::invalid(format!(
                "unknown generation mode '{}'",
                other
            ))),
        }
    }
}

/// Produce one simulated dataset with the same row count as `dataset`
///
/// # Arguments
/// * `dataset` - Observed data (not modified)
/// * `hypothesis` - Null hypothesis to simulate under
/// * `mode` - Generation mode
/// * `rng` - Source of randomness; seed it for reproducible output
pub fn generate<R: Rng + ?Sized>(
    dataset: &Dataset,
    hypothesis: &Hypothesis,
    mode: GenerationMode,
    rng: &mut R,
) -> StatsResult<Dataset> {
    mode.check(hypothesis)?;
    if dataset.is_empty() {
        return Err(StatsError::invalid("cannot resample an empty dataset"));
    }

    match mode {
        GenerationMode::Bootstrap => bootstrap(dataset, rng),
        GenerationMode::Permute => {
            let column = hypothesis
                .explanatory
                .as_deref()
                .ok_or_else(|| StatsError::invalid("no explanatory column to permute"))?;
            permute(dataset, column, rng)
        }
        GenerationMode::Draw => {
            let success = hypothesis
                .success
                .as_deref()
                .ok_or_else(|| StatsError::invalid("no success category to draw"))?;
            let p = hypothesis
                .point_value()
                .ok_or_else(|| StatsError::invalid("draw mode needs a point null"))?;
            draw(dataset, &hypothesis.response, success, p, rng)
        }
    }
}

/// Rows drawn uniformly with replacement, one index per row in row order
fn bootstrap<R: Rng + ?Sized>(dataset: &Dataset, rng: &mut R) -> StatsResult<Dataset> {
    let n = dataset.n_rows();
    let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
    dataset.take_rows(&indices)
}

fn permute<R: Rng + ?Sized>(dataset: &Dataset, column: &str, rng: &mut R) -> StatsResult<Dataset> {
    let shuffled = match dataset.column(column)? {
        Column::Numeric(values) => {
            let mut values = values.clone();
            values.shuffle(rng);
            Column::Numeric(values)
        }
        Column::Categorical(labels) => {
            let mut labels = labels.clone();
            labels.shuffle(rng);
            Column::Categorical(labels)
        }
    };
    dataset.clone().with_column(column, shuffled)
}

fn draw<R: Rng + ?Sized>(
    dataset: &Dataset,
    response: &str,
    success: &str,
    p: f64,
    rng: &mut R,
) -> StatsResult<Dataset> {
    let labels = dataset.categorical(response)?;
    let failure = labels
        .iter()
        .find(|l| *l != success)
        .cloned()
        .unwrap_or_else(|| format!("not {}", success));

    let drawn: Vec<String> = (0..labels.len())
        .map(|_| {
            if rng.gen_bool(p) {
                success.to_string()
            } else {
                failure.clone()
            }
        })
        .collect();
    dataset.clone().with_column(response, Column::Categorical(drawn))
}
