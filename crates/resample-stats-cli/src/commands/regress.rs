//! `regress` command: a single OLS fit with diagnostics

use anyhow::{bail, Result};
use clap::Args;
use resample_stats_core::diagnostics::{breusch_pagan, compute_residuals, compute_vif, jarque_bera};
use resample_stats_core::models::{design_matrix, fit_ols, ModelSpec, Term};
use resample_stats_core::{CovarianceType, OlsOptions};

use super::{flatten_list, load_listings, DataArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct RegressCommand {
    #[command(flatten)]
    pub data: DataArgs,

    /// Response column
    #[arg(short, long, default_value = "log_price")]
    pub response: String,

    /// Numeric terms (comma-separated or repeated)
    #[arg(short = 'n', long)]
    pub numeric: Vec<String>,

    /// Categorical terms, treatment coded
    #[arg(short = 'c', long)]
    pub categorical: Vec<String>,

    /// Numeric columns entered as squares
    #[arg(long)]
    pub squared: Vec<String>,

    /// Covariance estimator (classical, hc0, hc1, hc3)
    #[arg(long, default_value = "hc3")]
    pub covariance: String,

    /// Confidence level for coefficient intervals
    #[arg(long, default_value_t = 0.95)]
    pub level: f64,

    /// Studentized residual magnitude reported as an outlier
    #[arg(long, default_value_t = 3.0)]
    pub outlier_threshold: f64,
}

impl RegressCommand {
    fn spec(&self) -> ModelSpec {
        let terms = flatten_list(&self.numeric)
            .iter()
            .map(|n| Term::numeric(n))
            .chain(flatten_list(&self.categorical).iter().map(|n| Term::categorical(n)))
            .chain(flatten_list(&self.squared).iter().map(|n| Term::squared(n)))
            .collect();
        ModelSpec::new(&self.response, terms)
    }
}

pub fn execute(cmd: RegressCommand) -> Result<()> {
    let dataset = load_listings(&cmd.data)?;
    let spec = cmd.spec();
    if spec.terms.is_empty() {
        bail!("at least one --numeric, --categorical or --squared term is required");
    }

    let options = OlsOptions {
        compute_inference: true,
        confidence_level: cmd.level,
        covariance: cmd.covariance.parse::<CovarianceType>()?,
        ..Default::default()
    };
    let design = design_matrix(&dataset, &spec)?;
    let mut fit = fit_ols(&design.y, &design.x, &options)?;
    fit.core.feature_names = design.feature_names.clone();

    output::print_fit(&spec.to_string(), &fit);

    let bp = breusch_pagan(&fit.diagnostics.residuals, &design.x)?;
    let jb = jarque_bera(&fit.diagnostics.residuals)?;
    output::print_diagnostics(&bp, &jb);
    output::print_vif(&compute_vif(&design)?);

    let residuals = compute_residuals(&fit)?;
    let outliers = residuals.outliers(cmd.outlier_threshold);
    println!(
        "{} observations with |studentized residual| > {}",
        outliers.len(),
        cmd.outlier_threshold
    );
    Ok(())
}
