//! P-values from an empirical null distribution

use super::null_distribution::NullDistribution;
use crate::errors::{StatsError, StatsResult};

/// Tail direction of the alternative hypothesis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    #[default]
    TwoSided,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::TwoSided => write!(f, "two-sided"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "less" => Ok(Direction::Left),
            "right" | "greater" => Ok(Direction::Right),
            "two-sided" | "two_sided" | "both" => Ok(Direction::TwoSided),
            other => Err(StatsError::invalid(format!("unknown direction '{}'", other))),
        }
    }
}

/// P-value together with the direction it was computed for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PValueResult {
    pub p_value: f64,
    pub direction: Direction,
}

/// Compare an observed statistic against a null distribution
///
/// For permutation and draw distributions the values are used as-is and the
/// two-sided p-value is twice the smaller tail, capped at 1. For point-null
/// bootstrap distributions each value is read relative to the distribution's
/// own center, shifted onto the hypothesised value.
///
/// # Arguments
/// * `null` - Null distribution (must not be empty)
/// * `observed` - Statistic computed on the observed data
/// * `direction` - Tail direction of the alternative
pub fn get_p_value(
    null: &NullDistribution,
    observed: f64,
    direction: Direction,
) -> StatsResult<PValueResult> {
    if null.is_empty() {
        return Err(StatsError::invalid("null distribution is empty"));
    }
    if !observed.is_finite() {
        return Err(StatsError::invalid(format!(
            "observed statistic {} is not finite",
            observed
        )));
    }

    let n = null.len() as f64;
    let fraction = |pred: &dyn Fn(f64) -> bool| -> f64 {
        null.values().iter().filter(|&&v| pred(v)).count() as f64 / n
    };

    let p_value = match null.location() {
        None => {
            let right = || fraction(&|v| v >= observed);
            let left = || fraction(&|v| v <= observed);
            match direction {
                Direction::Right => right(),
                Direction::Left => left(),
                Direction::TwoSided => (2.0 * left().min(right())).min(1.0),
            }
        }
        Some(loc) => {
            let shift = loc.hypothesized - loc.center;
            match direction {
                Direction::Right => fraction(&|v| v + shift >= observed),
                Direction::Left => fraction(&|v| v + shift <= observed),
                Direction::TwoSided => {
                    let distance = (observed - loc.hypothesized).abs();
                    fraction(&|v| (v - loc.center).abs() >= distance)
                }
            }
        }
    };

    Ok(PValueResult {
        p_value: p_value.clamp(0.0, 1.0),
        direction,
    })
}
