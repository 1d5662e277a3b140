//! resample-stats CLI
//!
//! Command-line report for vehicle listing datasets: summaries, OLS model
//! sequences with diagnostics, and resampling hypothesis tests.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("resample_stats_core={}", default_level).parse()?)
                .add_directive("warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Describe(cmd) => commands::describe::execute(cmd),
        Commands::Test(cmd) => commands::test::execute(cmd),
        Commands::Regress(cmd) => commands::regress::execute(cmd),
        Commands::Report(cmd) => commands::report::execute(cmd),
    }
}
