//! `test` command: resampling hypothesis tests

use anyhow::Result;
use clap::{Args, Subcommand};
use resample_stats_core::inference::{
    build_null_distribution, calculate, chisq_test, get_confidence_interval, resampling_test,
    CiMethod, ConfidenceInterval, ContingencyTable, Direction, GenerationMode, Hypothesis,
    NullDistributionOptions, Statistic,
};
use resample_stats_core::Dataset;

use super::{load_listings, DataArgs, ResamplingArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct TestCommand {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub resampling: ResamplingArgs,

    #[command(subcommand)]
    pub kind: TestKind,
}

#[derive(Subcommand, Debug)]
pub enum TestKind {
    /// Point null on the mean of a numeric column
    Mean {
        /// Numeric column
        #[arg(long, default_value = "price")]
        column: String,

        /// Hypothesized mean
        #[arg(long)]
        mu: f64,

        /// Level of the bootstrap confidence interval
        #[arg(long, default_value_t = 0.95)]
        level: f64,
    },

    /// Point null on the share of one category
    Proportion {
        /// Categorical column
        #[arg(long, default_value = "transmission")]
        column: String,

        /// Category counted as a success
        #[arg(long)]
        success: String,

        /// Hypothesized proportion
        #[arg(long, default_value_t = 0.5)]
        p: f64,
    },

    /// Difference in group means under independence
    Diff {
        /// Numeric response
        #[arg(long, default_value = "price")]
        response: String,

        /// Grouping column
        #[arg(long, default_value = "transmission")]
        group: String,

        /// Group whose mean comes first in the difference
        #[arg(long)]
        first: String,

        /// Group whose mean is subtracted
        #[arg(long)]
        second: String,
    },

    /// Independence of two categorical columns
    Chisq {
        #[arg(long, default_value = "fuel_type")]
        response: String,

        #[arg(long, default_value = "transmission")]
        explanatory: String,
    },
}

pub fn execute(cmd: TestCommand) -> Result<()> {
    let dataset = load_listings(&cmd.data)?;
    let options = cmd.resampling.options()?;
    let direction = match cmd.kind {
        TestKind::Chisq { .. } => cmd.resampling.direction_or(Direction::Right)?,
        _ => cmd.resampling.direction_or(Direction::TwoSided)?,
    };

    let (hypothesis, statistic) = match &cmd.kind {
        TestKind::Mean { column, mu, .. } => {
            (Hypothesis::point(column, *mu), Statistic::mean(column))
        }
        TestKind::Proportion { column, success, p } => (
            Hypothesis::point(column, *p).with_success(success),
            Statistic::proportion(column, success),
        ),
        TestKind::Diff {
            response,
            group,
            first,
            second,
        } => (
            Hypothesis::independence(response, group),
            Statistic::diff_in_means(response, group, first, second),
        ),
        TestKind::Chisq {
            response,
            explanatory,
        } => (
            Hypothesis::independence(response, explanatory),
            Statistic::chi_square(response, explanatory),
        ),
    };

    tracing::info!(statistic = %statistic, reps = options.reps, "running resampling test");
    let result = resampling_test(&dataset, &hypothesis, &statistic, &options, direction)?;

    match &cmd.kind {
        TestKind::Mean { column, level, .. } => {
            let ci = bootstrap_interval(&dataset, column, &options, *level)?;
            output::print_test(&result, Some(&ci));
        }
        TestKind::Chisq {
            response,
            explanatory,
        } => {
            output::print_test(&result, None);
            let table = ContingencyTable::from_columns(&dataset, response, explanatory)?;
            output::print_chisq(&chisq_test(&table)?);
        }
        _ => output::print_test(&result, None),
    }
    Ok(())
}

/// Percentile interval for a mean, from a plain (unshifted) bootstrap
pub fn bootstrap_interval(
    dataset: &Dataset,
    column: &str,
    options: &NullDistributionOptions,
    level: f64,
) -> Result<ConfidenceInterval> {
    let statistic = Statistic::mean(column);
    let point = calculate(dataset, &statistic)?;
    // The point value only anchors the bootstrap; it does not shift the replicates
    let hypothesis = Hypothesis::point(column, point);
    let options = NullDistributionOptions {
        mode: Some(GenerationMode::Bootstrap),
        ..options.clone()
    };
    let dist = build_null_distribution(dataset, &hypothesis, &statistic, &options, None)?;
    Ok(get_confidence_interval(&dist, level, CiMethod::Percentile)?)
}
