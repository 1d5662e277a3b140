//! `report` command: the full listing analysis
//!
//! - Clean: derive age, log price, lump rare fuel types
//! - Describe numeric and categorical columns
//! - Fit a nested sequence of log-price models with robust standard errors
//!   and compare successive models by F test
//! - Residual diagnostics on the largest model
//! - Resampling tests on the mean price, the manual share, the
//!   automatic/manual price gap and fuel type by transmission

use anyhow::{Context, Result};
use clap::Args;
use resample_stats_core::data::cleaning::{keep_categories, lump_rare};
use resample_stats_core::data::summary::{count_by, describe, group_means};
use resample_stats_core::diagnostics::{breusch_pagan, compute_vif, jarque_bera};
use resample_stats_core::inference::{
    chisq_test, resampling_test, ContingencyTable, Direction, Hypothesis,
    NullDistributionOptions, Statistic,
};
use resample_stats_core::models::{anova_compare, design_matrix, fit_ols, ModelSpec, Term};
use resample_stats_core::{CovarianceType, Dataset, FitResult, OlsOptions};

use super::test::bootstrap_interval;
use super::{load_listings, DataArgs, ResamplingArgs};
use crate::output;

const NUMERIC_COLUMNS: [&str; 6] = [
    "price",
    "log_price",
    "age",
    "kilometer",
    "engine",
    "fuel_tank_capacity",
];
const CATEGORICAL_COLUMNS: [&str; 4] = [
    "fuel_type",
    "transmission",
    "drivetrain",
    "seating_capacity",
];

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub resampling: ResamplingArgs,

    /// Hypothesized mean price
    #[arg(long, default_value_t = 1_000_000.0)]
    pub price_mu: f64,

    /// Hypothesized share of manual listings
    #[arg(long, default_value_t = 0.5)]
    pub manual_share: f64,

    /// Covariance estimator for the model sequence
    #[arg(long, default_value = "hc3")]
    pub covariance: String,

    /// Fuel types seen fewer times than this are grouped as "Other"
    #[arg(long, default_value_t = 30)]
    pub min_level_count: usize,
}

/// Nested log-price models, smallest first
pub fn model_sequence() -> Vec<ModelSpec> {
    let m1 = ModelSpec::new("log_price", vec![Term::numeric("age")]);
    let m2 = m1.clone().with_term(Term::numeric("kilometer"));
    let m3 = m2
        .clone()
        .with_term(Term::numeric("engine"))
        .with_term(Term::numeric("fuel_tank_capacity"));
    let m4 = m3
        .clone()
        .with_term(Term::categorical("fuel_type"))
        .with_term(Term::categorical("transmission"))
        .with_term(Term::categorical("drivetrain"));
    let m5 = m4.clone().with_term(Term::squared("age"));
    vec![m1, m2, m3, m4, m5]
}

pub fn execute(cmd: ReportCommand) -> Result<()> {
    let raw = load_listings(&cmd.data)?;
    let dataset = lump_rare(&raw, "fuel_type", cmd.min_level_count, "Other")?;
    println!("{} listings after cleaning", dataset.n_rows());

    summarise(&dataset)?;

    let options = OlsOptions {
        compute_inference: true,
        covariance: cmd.covariance.parse::<CovarianceType>()?,
        ..Default::default()
    };
    fit_models(&dataset, &options)?;

    run_tests(&cmd, &dataset)
}

fn summarise(dataset: &Dataset) -> Result<()> {
    let rows = NUMERIC_COLUMNS
        .iter()
        .map(|c| describe(dataset, c))
        .collect::<Result<Vec<_>, _>>()?;
    output::print_describe(&rows);
    for column in CATEGORICAL_COLUMNS {
        output::print_counts(column, &count_by(dataset, column)?);
    }
    let means = group_means(dataset, "price", "transmission")?;
    output::print_group_means("price", "transmission", &means);
    Ok(())
}

fn fit_models(dataset: &Dataset, options: &OlsOptions) -> Result<()> {
    let specs = model_sequence();
    let mut fits: Vec<FitResult> = Vec::with_capacity(specs.len());
    let mut last_design = None;

    for (i, spec) in specs.iter().enumerate() {
        let design = design_matrix(dataset, spec)?;
        let mut fit = fit_ols(&design.y, &design.x, options)
            .with_context(|| format!("fitting {}", spec))?;
        fit.core.feature_names = design.feature_names.clone();
        output::print_fit(&format!("Model {}: {}", i + 1, spec), &fit);
        fits.push(fit);
        last_design = Some(design);
    }

    let comparisons = fits
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            anova_compare(&pair[0], &pair[1])
                .map(|a| (format!("Model {} vs {}", i + 1, i + 2), a))
        })
        .collect::<Result<Vec<_>, _>>()?;
    output::print_anova(&comparisons);

    if let (Some(fit), Some(design)) = (fits.last(), last_design) {
        let bp = breusch_pagan(&fit.diagnostics.residuals, &design.x)?;
        let jb = jarque_bera(&fit.diagnostics.residuals)?;
        output::print_diagnostics(&bp, &jb);
        output::print_vif(&compute_vif(&design)?);
    }
    Ok(())
}

/// Options for one report test; a `--mode` that cannot simulate this
/// hypothesis falls back to the hypothesis's default mode
fn options_for(base: &NullDistributionOptions, hypothesis: &Hypothesis) -> NullDistributionOptions {
    match base.mode {
        Some(mode) if mode.check(hypothesis).is_err() => {
            tracing::warn!(
                mode = mode.name(),
                response = %hypothesis.response,
                "requested mode does not fit this test, using its default"
            );
            NullDistributionOptions {
                mode: None,
                ..base.clone()
            }
        }
        _ => base.clone(),
    }
}

fn run_tests(cmd: &ReportCommand, dataset: &Dataset) -> Result<()> {
    let options = cmd.resampling.options()?;
    let direction = cmd.resampling.direction_or(Direction::TwoSided)?;

    let price_null = Hypothesis::point("price", cmd.price_mu);
    let mean = resampling_test(
        dataset,
        &price_null,
        &Statistic::mean("price"),
        &options_for(&options, &price_null),
        direction,
    )?;
    let ci = bootstrap_interval(dataset, "price", &options, 0.95)?;
    output::print_test(&mean, Some(&ci));

    let share_null = Hypothesis::point("transmission", cmd.manual_share).with_success("Manual");
    let share = resampling_test(
        dataset,
        &share_null,
        &Statistic::proportion("transmission", "Manual"),
        &options_for(&options, &share_null),
        direction,
    )?;
    output::print_test(&share, None);

    let two_groups = keep_categories(dataset, "transmission", &["Automatic", "Manual"])?;
    let gap_null = Hypothesis::independence("price", "transmission");
    let gap = resampling_test(
        &two_groups,
        &gap_null,
        &Statistic::diff_in_means("price", "transmission", "Automatic", "Manual"),
        &options_for(&options, &gap_null),
        direction,
    )
    .context("testing the automatic/manual price gap")?;
    output::print_test(&gap, None);

    let fuel_null = Hypothesis::independence("fuel_type", "transmission");
    let fuel = resampling_test(
        dataset,
        &fuel_null,
        &Statistic::chi_square("fuel_type", "transmission"),
        &options_for(&options, &fuel_null),
        cmd.resampling.direction_or(Direction::Right)?,
    )?;
    output::print_test(&fuel, None);
    let table = ContingencyTable::from_columns(dataset, "fuel_type", "transmission")?;
    output::print_chisq(&chisq_test(&table)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resample_stats_core::inference::GenerationMode;

    #[test]
    fn test_explicit_mode_only_applies_where_it_fits() {
        let base = NullDistributionOptions {
            reps: 200,
            mode: Some(GenerationMode::Bootstrap),
            seed: Some(9),
            ..Default::default()
        };

        let mean_null = Hypothesis::point("price", 1.0);
        let kept = options_for(&base, &mean_null);
        assert_eq!(kept.mode, Some(GenerationMode::Bootstrap));
        assert_eq!(kept.seed, Some(9));

        let gap_null = Hypothesis::independence("price", "transmission");
        let dropped = options_for(&base, &gap_null);
        assert_eq!(dropped.mode, None);
        assert_eq!(dropped.reps, 200);
        assert_eq!(dropped.seed, Some(9));
    }

    #[test]
    fn test_model_sequence_is_nested() {
        let specs = model_sequence();
        assert_eq!(specs.len(), 5);
        for pair in specs.windows(2) {
            assert!(pair[1].terms.len() > pair[0].terms.len());
            assert_eq!(pair[1].terms[..pair[0].terms.len()], pair[0].terms[..]);
        }
        assert_eq!(
            specs[4].to_string(),
            "log_price ~ age + kilometer + engine + fuel_tank_capacity + C(fuel_type) \
             + C(transmission) + C(drivetrain) + I(age^2)"
        );
    }
}
