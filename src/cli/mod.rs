//! Command-line parsing for the distribution fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::models::{Family, parse_family};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "distfit", version, about = "Fit probability distributions to 1-D samples")]
pub struct Cli {
    /// Log verbosity on stderr (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value_t = Level::WARN)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the supported families and their parameters.
    Families,
    /// Fit one family automatically, print parameters/quality, and optionally plot/export.
    Fit(FitArgs),
    /// Evaluate manually chosen parameters against the sample.
    Eval(EvalArgs),
    /// Print suggested slider ranges for a family.
    Ranges(RangesArgs),
    /// Fit every family and list the metrics side by side (catalog order).
    Scan(ScanArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI for manual fitting.
    Tui(TuiArgs),
}

/// Where the sample comes from (shared by every data-consuming command).
///
/// At most one source may be given; with none, `fit` and `tui` prompt for a
/// CSV under the working directory.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Inline values, separated by commas and/or whitespace.
    #[arg(long, value_name = "LIST", conflicts_with_all = ["file", "url", "synthetic"])]
    pub values: Option<String>,

    /// CSV file to read.
    #[arg(short = 'f', long, value_name = "CSV", conflicts_with_all = ["url", "synthetic"])]
    pub file: Option<PathBuf>,

    /// CSV column (default: first all-numeric column).
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Fetch a CSV or value list over HTTP (empty: use DISTFIT_DATA_URL).
    #[arg(
        long,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with = "synthetic"
    )]
    pub url: Option<String>,

    /// Draw a synthetic sample from this family.
    #[arg(long, value_name = "FAMILY", value_parser = parse_family)]
    pub synthetic: Option<Family>,

    /// Parameters for `--synthetic` (catalog order).
    #[arg(long, value_name = "LIST", requires = "synthetic")]
    pub synthetic_params: Option<String>,

    /// Synthetic sample size.
    #[arg(long, default_value_t = 500)]
    pub n: usize,

    /// Synthetic sample seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options shared by plotting commands.
#[derive(Debug, Args, Clone)]
pub struct PlotOptions {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Number of points on the density curve.
    #[arg(long, default_value_t = 200)]
    pub points: usize,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Distribution family (name or alias, case-insensitive).
    #[arg(short = 'd', long = "dist", value_parser = parse_family, default_value = "normal")]
    pub family: Family,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotOptions,

    /// Optimizer iteration budget.
    #[arg(long, default_value_t = 800)]
    pub max_iterations: usize,

    /// Export curve (family + params + quality + density grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,

    /// Export fit metrics to CSV.
    #[arg(long = "export-metrics", value_name = "CSV")]
    pub export_metrics: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    /// Distribution family (name or alias, case-insensitive).
    #[arg(short = 'd', long = "dist", value_parser = parse_family)]
    pub family: Family,

    /// Parameter values in catalog order, e.g. `--params 0,1`.
    #[arg(long, value_name = "LIST")]
    pub params: String,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotOptions,

    /// Export curve to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RangesArgs {
    /// Distribution family (name or alias, case-insensitive).
    #[arg(short = 'd', long = "dist", value_parser = parse_family)]
    pub family: Family,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Optimizer iteration budget.
    #[arg(long, default_value_t = 800)]
    pub max_iterations: usize,

    /// Export one metrics row per family to CSV.
    #[arg(long = "export-metrics", value_name = "CSV")]
    pub export_metrics: Option<PathBuf>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Initial family.
    #[arg(short = 'd', long = "dist", value_parser = parse_family)]
    pub family: Option<Family>,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `distfit fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_accepts_aliases_and_sources() {
        let cli = Cli::try_parse_from([
            "distfit", "fit", "-d", "gaussian", "--values", "1,2,3", "--no-plot",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.family, Family::Normal);
        assert_eq!(args.data.values.as_deref(), Some("1,2,3"));
        assert!(args.plot.no_plot);
        assert_eq!(cli.log_level, Level::WARN);
    }

    #[test]
    fn unknown_family_is_a_usage_error() {
        assert!(Cli::try_parse_from(["distfit", "ranges", "-d", "cauchy"]).is_err());
    }

    #[test]
    fn sources_are_exclusive() {
        let res = Cli::try_parse_from([
            "distfit", "scan", "--values", "1,2", "-f", "x.csv",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn bare_url_flag_means_env_default() {
        let cli = Cli::try_parse_from(["distfit", "scan", "--url"]).unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.data.url.as_deref(), Some(""));
    }
}
