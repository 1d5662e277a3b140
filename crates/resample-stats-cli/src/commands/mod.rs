//! Subcommands and the argument groups they share

pub mod describe;
pub mod regress;
pub mod report;
pub mod test;

use anyhow::{Context, Result};
use clap::Args;
use resample_stats_core::data::cleaning::{derive_age, log_transform};
use resample_stats_core::data::{load_csv, vehicle_listing_schema};
use resample_stats_core::inference::{Direction, GenerationMode, NullDistributionOptions};
use resample_stats_core::Dataset;
use std::path::PathBuf;

/// Input file and cleaning parameters
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Listings CSV file
    #[arg(short, long, env = "RESAMPLE_DATA")]
    pub data: PathBuf,

    /// Year used to turn the model year into an age
    #[arg(long, default_value_t = 2023.0)]
    pub reference_year: f64,
}

/// Resampling parameters
#[derive(Args, Debug, Clone)]
pub struct ResamplingArgs {
    /// Number of null-distribution replicates
    #[arg(long, default_value_t = 1000, env = "RESAMPLE_REPS")]
    pub reps: usize,

    /// Seed for reproducible replicates
    #[arg(long, env = "RESAMPLE_SEED")]
    pub seed: Option<u64>,

    /// Alternative direction (left, right, two-sided); two-sided for means
    /// and proportions, right for chi-square if omitted
    #[arg(long)]
    pub direction: Option<String>,

    /// Generation mode (bootstrap, permute, draw); chosen from the hypothesis if omitted
    #[arg(long)]
    pub mode: Option<String>,

    /// Run replicates on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl ResamplingArgs {
    pub fn options(&self) -> Result<NullDistributionOptions> {
        let mode = self
            .mode
            .as_deref()
            .map(str::parse::<GenerationMode>)
            .transpose()?;
        Ok(NullDistributionOptions {
            reps: self.reps,
            mode,
            seed: self.seed,
            parallel: !self.sequential,
        })
    }

    /// Requested direction, or `default` when none was given
    pub fn direction_or(&self, default: Direction) -> Result<Direction> {
        match &self.direction {
            Some(d) => Ok(d.parse()?),
            None => Ok(default),
        }
    }
}

/// Load the listings file and add the derived `age` and `log_price` columns
pub fn load_listings(args: &DataArgs) -> Result<Dataset> {
    let report = load_csv(&args.data, &vehicle_listing_schema())
        .with_context(|| format!("loading {}", args.data.display()))?;
    if report.dropped_rows > 0 {
        tracing::info!(
            dropped = report.dropped_rows,
            read = report.rows_read,
            "dropped rows with missing values"
        );
    }
    let dataset = derive_age(&report.dataset, "year", args.reference_year, "age")?;
    let dataset = log_transform(&dataset, "price", "log_price")?;
    Ok(dataset)
}

/// Split comma-separated lists given as repeated flags
pub fn flatten_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flatten_list() {
        let values = vec!["age, kilometer".to_string(), "engine".to_string()];
        assert_eq!(flatten_list(&values), vec!["age", "kilometer", "engine"]);
    }

    #[test]
    fn test_resampling_options() {
        let args = ResamplingArgs {
            reps: 200,
            seed: Some(1),
            direction: Some("greater".into()),
            mode: Some("permute".into()),
            sequential: true,
        };
        let options = args.options().unwrap();
        assert_eq!(options.reps, 200);
        assert_eq!(options.mode, Some(GenerationMode::Permute));
        assert!(!options.parallel);
        assert_eq!(args.direction_or(Direction::TwoSided).unwrap(), Direction::Right);

        let args = ResamplingArgs {
            direction: None,
            ..args
        };
        assert_eq!(args.direction_or(Direction::Right).unwrap(), Direction::Right);
        assert_eq!(args.direction_or(Direction::TwoSided).unwrap(), Direction::TwoSided);
    }

    #[test]
    fn test_load_listings_derives_columns() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "Price,Year,Kilometer,Fuel Type,Transmission,Engine,Drivetrain,Seating Capacity,Fuel Tank Capacity"
        )
        .unwrap();
        writeln!(file, "505000,2017,87150,Petrol,Manual,1198 cc,FWD,5,35").unwrap();
        writeln!(file, "450000,2014,75000,Diesel,Manual,1248 cc,FWD,5,42").unwrap();
        writeln!(file, "220000,2011,,Petrol,Manual,1197 cc,FWD,5,35").unwrap();

        let args = DataArgs {
            data: file.path().to_path_buf(),
            reference_year: 2023.0,
        };
        let data = load_listings(&args).unwrap();
        assert_eq!(data.n_rows(), 2);
        assert_eq!(data.numeric("age").unwrap(), &[6.0, 9.0]);
        assert!((data.numeric("log_price").unwrap()[0] - 505000.0_f64.ln()).abs() < 1e-12);
    }
}
