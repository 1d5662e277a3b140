//! CLI argument parsing

use clap::{Parser, Subcommand};

use crate::commands::{
    describe::DescribeCommand, regress::RegressCommand, report::ReportCommand, test::TestCommand,
};

/// Resampling statistics for vehicle listings
///
/// Loads a listings CSV, cleans it, and prints summary tables, regression
/// results and randomization test results.
#[derive(Parser, Debug)]
#[command(name = "resample-stats")]
#[command(version)]
#[command(about = "Resampling hypothesis tests and OLS models for listing data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarise numeric and categorical columns
    #[command(alias = "summary")]
    Describe(DescribeCommand),

    /// Run a resampling hypothesis test
    Test(TestCommand),

    /// Fit an OLS model
    #[command(alias = "ols")]
    Regress(RegressCommand),

    /// Run the full listing analysis
    Report(ReportCommand),
}
