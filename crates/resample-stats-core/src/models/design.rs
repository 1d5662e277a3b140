//! Model specifications and design matrices built from a dataset

use super::ols::fit_ols;
use crate::data::Dataset;
use crate::errors::{StatsError, StatsResult};
use crate::types::{FitResult, OlsOptions};
use std::collections::BTreeSet;

/// Right-hand-side term of a linear model
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Numeric column used as-is
    Numeric(String),
    /// Categorical column in treatment coding; the first level in sorted
    /// order is the reference
    Categorical(String),
    /// Square of a numeric column
    Squared(String),
}

impl Term {
    pub fn numeric(name: &str) -> Self {
        Term::Numeric(name.to_string())
    }

    pub fn categorical(name: &str) -> Self {
        Term::Categorical(name.to_string())
    }

    pub fn squared(name: &str) -> Self {
        Term::Squared(name.to_string())
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Numeric(name) => write!(f, "{}", name),
            Term::Categorical(name) => write!(f, "C({})", name),
            Term::Squared(name) => write!(f, "I({}^2)", name),
        }
    }
}

/// `response ~ terms` with an intercept
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub response: String,
    pub terms: Vec<Term>,
}

impl ModelSpec {
    pub fn new(response: &str, terms: Vec<Term>) -> Self {
        Self {
            response: response.to_string(),
            terms,
        }
    }

    /// Same model with one more term
    pub fn with_term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rhs: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "{} ~ {}", self.response, rhs.join(" + "))
    }
}

/// Response vector and feature columns for a model
#[derive(Debug, Clone)]
pub struct Design {
    pub y: Vec<f64>,
    pub x: Vec<Vec<f64>>,
    pub feature_names: Vec<String>,
}

/// Expand a model specification into numeric feature columns
pub fn design_matrix(dataset: &Dataset, spec: &ModelSpec) -> StatsResult<Design> {
    if spec.terms.is_empty() {
        return Err(StatsError::EmptyInput { field: "terms" });
    }
    let y = dataset.numeric(&spec.response)?.to_vec();
    let mut x = Vec::new();
    let mut feature_names = Vec::new();

    for term in &spec.terms {
        match term {
            Term::Numeric(name) => {
                x.push(dataset.numeric(name)?.to_vec());
                feature_names.push(name.clone());
            }
            Term::Squared(name) => {
                x.push(dataset.numeric(name)?.iter().map(|v| v * v).collect());
                feature_names.push(term.to_string());
            }
            Term::Categorical(name) => {
                let labels = dataset.categorical(name)?;
                let levels: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
                if levels.len() < 2 {
                    return Err(StatsError::InvalidInput(format!(
                        "categorical term '{}' has a single level",
                        name
                    )));
                }
                for level in levels.into_iter().skip(1) {
                    x.push(
                        labels
                            .iter()
                            .map(|l| if l == level { 1.0 } else { 0.0 })
                            .collect(),
                    );
                    feature_names.push(format!("{}[T.{}]", name, level));
                }
            }
        }
    }

    Ok(Design {
        y,
        x,
        feature_names,
    })
}

/// Build the design for `spec` and fit it by OLS
pub fn fit_model(
    dataset: &Dataset,
    spec: &ModelSpec,
    options: &OlsOptions,
) -> StatsResult<FitResult> {
    let design = design_matrix(dataset, spec)?;
    let mut result = fit_ols(&design.y, &design.x, options)?;
    result.core.feature_names = design.feature_names;
    Ok(result)
}
