//! Regression model implementations

mod anova;
mod design;
mod ols;

pub use anova::{anova_compare, AnovaComparison};
pub use design::{design_matrix, fit_model, Design, ModelSpec, Term};
pub use ols::fit_ols;
