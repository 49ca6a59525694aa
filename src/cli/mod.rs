//! Command-line parsing for the Hubble-law line fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::SyntheticConfig;
use crate::domain::{ColumnSpec, DEFAULT_SIGMA_COLUMN, DEFAULT_X_COLUMN, DEFAULT_Y_COLUMN};
use crate::group::GroupColumns;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "hubble",
    version,
    about = "Weighted least-squares line fitting for velocity-distance data"
)]
pub struct Cli {
    /// Log filter for stderr diagnostics (e.g. `info`, `hubble_fit=debug`).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit y = a + b*x to one CSV table and print the parameters.
    Fit(FitArgs),
    /// Fit several CSV tables independently (in parallel).
    Batch(BatchArgs),
    /// Reduce raw measurements to one row per group (mean, standard error).
    Group(GroupArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
    /// Write the built-in 22-nebula velocity/distance table.
    Sample(SampleArgs),
    /// Write a seeded synthetic Hubble-law dataset.
    Simulate(SimulateArgs),
    /// Print the Hubble time 1/H0 for H0 in km/s/Mpc.
    Age(AgeArgs),
}

/// Which CSV headers hold x, y and sigma.
#[derive(Debug, Args, Clone)]
pub struct ColumnArgs {
    /// Header of the abscissa column.
    #[arg(long = "x-column", env = "HUBBLE_X_COLUMN", default_value = DEFAULT_X_COLUMN)]
    pub x: String,

    /// Header of the ordinate column.
    #[arg(long = "y-column", env = "HUBBLE_Y_COLUMN", default_value = DEFAULT_Y_COLUMN)]
    pub y: String,

    /// Header of the per-point uncertainty column.
    #[arg(long = "sigma-column", env = "HUBBLE_SIGMA_COLUMN", default_value = DEFAULT_SIGMA_COLUMN)]
    pub sigma: String,
}

impl ColumnArgs {
    pub fn to_spec(&self) -> ColumnSpec {
        ColumnSpec {
            x: self.x.clone(),
            y: self.y.clone(),
            sigma: self.sigma.clone(),
        }
    }
}

/// Options for fitting one table.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input CSV with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Run an unweighted fit with residual-based errors; the sigma column is optional.
    #[arg(long, conflicts_with_all = ["export_json", "export_residuals"])]
    pub ordinary: bool,

    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write an SVG plot (points, error bars, fitted line).
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export the fit (parameters + observations + line grid) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export per-point fitted values, residuals and pulls to CSV.
    #[arg(long = "export-residuals", value_name = "CSV")]
    pub export_residuals: Option<PathBuf>,
}

/// Options for fitting many tables.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Input CSV files, each fitted on its own.
    #[arg(value_name = "CSV", required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// Options for the grouping preprocessor.
#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Raw measurement CSV.
    #[arg(value_name = "RAW_CSV")]
    pub input: PathBuf,

    /// Output CSV (`group,x,y,sigma,count`).
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Header of the group label column.
    #[arg(long = "label-column", default_value = "group")]
    pub label: String,

    /// Header of the abscissa column.
    #[arg(long = "x-column", default_value = "x")]
    pub x: String,

    /// Header of the ordinate column.
    #[arg(long = "y-column", default_value = "y")]
    pub y: String,

    /// Also drop groups whose members agree exactly (zero standard error).
    #[arg(long)]
    pub drop_zero_spread: bool,
}

impl GroupArgs {
    pub fn to_columns(&self) -> GroupColumns {
        GroupColumns {
            label: self.label.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

/// Options for plotting a saved fit.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Fit JSON file produced by `hubble fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Also write an SVG plot.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Options for writing the nebula table.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Output CSV.
    #[arg(short = 'o', long)]
    pub output: PathBuf,
}

/// Options for synthetic data generation.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Output CSV (`x,y,sigma`).
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 24)]
    pub count: usize,

    /// True slope (km/s/Mpc).
    #[arg(long, default_value_t = 70.0)]
    pub h0: f64,

    /// True intercept (km/s).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub intercept: f64,

    /// Smallest distance (Mpc).
    #[arg(long, default_value_t = 1.0)]
    pub x_min: f64,

    /// Largest distance (Mpc).
    #[arg(long, default_value_t = 30.0)]
    pub x_max: f64,

    /// Gaussian noise standard deviation (also written as sigma).
    #[arg(long, default_value_t = 50.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl SimulateArgs {
    pub fn to_config(&self) -> SyntheticConfig {
        SyntheticConfig {
            n: self.count,
            h0: self.h0,
            intercept: self.intercept,
            x_min: self.x_min,
            x_max: self.x_max,
            noise_sigma: self.noise,
            seed: self.seed,
        }
    }
}

/// Options for the Hubble time.
#[derive(Debug, Args)]
pub struct AgeArgs {
    /// Hubble constant in km/s/Mpc.
    #[arg(value_name = "H0", allow_negative_numbers = true)]
    pub h0: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fit_defaults_to_standard_columns() {
        let cli = Cli::try_parse_from(["hubble", "fit", "data.csv"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.columns.to_spec(), ColumnSpec::default());
        assert!(!args.ordinary);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn ordinary_conflicts_with_json_export() {
        let err = Cli::try_parse_from(["hubble", "fit", "d.csv", "--ordinary", "--export-json", "f.json"]);
        assert!(err.is_err());
    }

    #[test]
    fn batch_needs_at_least_one_file() {
        assert!(Cli::try_parse_from(["hubble", "batch"]).is_err());
        let cli = Cli::try_parse_from(["hubble", "batch", "a.csv", "b.csv", "--log-level", "info"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(cli.log_level, "info");
    }
}
