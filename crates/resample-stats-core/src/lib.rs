//! resample-stats-core: Core statistics library for tabular listing analysis
//!
//! This crate provides resampling-based hypothesis tests (bootstrap,
//! permutation, draw-from-null), ordinary least squares models with
//! heteroskedasticity-robust inference, and regression diagnostics.

pub mod data;
pub mod diagnostics;
pub mod errors;
pub mod inference;
mod linalg;
pub mod models;
pub mod types;

pub use data::{Column, ColumnKind, Dataset};
pub use errors::{StatsError, StatsResult};
pub use types::*;
