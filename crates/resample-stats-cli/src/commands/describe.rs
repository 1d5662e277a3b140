//! `describe` command

use anyhow::Result;
use clap::Args;
use resample_stats_core::data::summary::{count_by, describe, group_means};
use resample_stats_core::ColumnKind;

use super::{flatten_list, load_listings, DataArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct DescribeCommand {
    #[command(flatten)]
    pub data: DataArgs,

    /// Columns to summarise (comma-separated); all columns if omitted
    #[arg(short, long)]
    pub columns: Vec<String>,

    /// Also print the mean of this numeric column within each category
    #[arg(long)]
    pub by: Option<String>,

    /// Numeric column used with --by
    #[arg(long, default_value = "price")]
    pub response: String,
}

pub fn execute(cmd: DescribeCommand) -> Result<()> {
    let dataset = load_listings(&cmd.data)?;
    let columns = match flatten_list(&cmd.columns) {
        requested if !requested.is_empty() => requested,
        _ => dataset.column_names().to_vec(),
    };

    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for name in &columns {
        match dataset.column(name)?.kind() {
            ColumnKind::Numeric => numeric.push(describe(&dataset, name)?),
            ColumnKind::Categorical => categorical.push((name.clone(), count_by(&dataset, name)?)),
        }
    }

    println!("{} listings", dataset.n_rows());
    if !numeric.is_empty() {
        output::print_describe(&numeric);
    }
    for (name, counts) in &categorical {
        output::print_counts(name, counts);
    }

    if let Some(group) = &cmd.by {
        let means = group_means(&dataset, &cmd.response, group)?;
        output::print_group_means(&cmd.response, group, &means);
    }
    Ok(())
}
