//! Diagnostic functions for regression models

mod breusch_pagan;
mod jarque_bera;
mod residuals;
mod vif;

pub use breusch_pagan::{breusch_pagan, BreuschPaganResult};
pub use jarque_bera::{jarque_bera, JarqueBeraResult};
pub use residuals::{compute_residuals, ResidualsResult};
pub use vif::compute_vif;
