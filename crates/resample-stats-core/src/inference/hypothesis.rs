//! Null hypotheses and the columns they are about
//!
//! Names the response (and optionally explanatory) column and states the
//! null hypothesis the resampling engine simulates under.

use crate::data::{ColumnKind, Dataset};
use crate::errors::{StatsError, StatsResult};

/// Null hypothesis type
#[derive(Debug, Clone, PartialEq)]
pub enum NullHypothesis {
    /// A single population parameter equals `value`
    Point { value: f64 },
    /// Response and explanatory columns are independent
    Independence,
}

/// Which columns a test is about and what is assumed under the null
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub response: String,
    pub explanatory: Option<String>,
    /// Category counted as a success for proportion tests
    pub success: Option<String>,
    pub null: NullHypothesis,
}

impl Hypothesis {
    /// Point null on a single response column: parameter = `value`
    pub fn point(response: &str, value: f64) -> Self {
        Self {
            response: response.to_string(),
            explanatory: None,
            success: None,
            null: NullHypothesis::Point { value },
        }
    }

    /// Independence null between `response` and `explanatory`
    pub fn independence(response: &str, explanatory: &str) -> Self {
        Self {
            response: response.to_string(),
            explanatory: Some(explanatory.to_string()),
            success: None,
            null: NullHypothesis::Independence,
        }
    }

    /// Designate the success category of a categorical response
    pub fn with_success(mut self, success: &str) -> Self {
        self.success = Some(success.to_string());
        self
    }

    /// Hypothesised parameter value of a point null
    pub fn point_value(&self) -> Option<f64> {
        match self.null {
            NullHypothesis::Point { value } => Some(value),
            NullHypothesis::Independence => None,
        }
    }

    /// Check the hypothesis against a dataset before any resampling
    pub fn validate(&self, dataset: &Dataset) -> StatsResult<()> {
        if dataset.is_empty() {
            return Err(StatsError::invalid("dataset is empty"));
        }
        let response_kind = dataset.column(&self.response)?.kind();

        match (&self.null, &self.explanatory) {
            (NullHypothesis::Independence, None) => {
                return Err(StatsError::invalid(
                    "an independence null requires an explanatory column",
                ));
            }
            (NullHypothesis::Independence, Some(explanatory)) => {
                if explanatory == &self.response {
                    return Err(StatsError::invalid(
                        "response and explanatory columns must differ",
                    ));
                }
                dataset.column(explanatory)?;
            }
            (NullHypothesis::Point { value }, _) => {
                if !value.is_finite() {
                    return Err(StatsError::invalid(format!(
                        "hypothesised value {} is not finite",
                        value
                    )));
                }
            }
        }

        if let Some(success) = &self.success {
            if response_kind != ColumnKind::Categorical {
                return Err(StatsError::invalid(format!(
                    "success '{}' given but response '{}' is {}",
                    success, self.response, response_kind
                )));
            }
        }
        Ok(())
    }
}
