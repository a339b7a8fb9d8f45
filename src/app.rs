//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - resolves the data source into a sample
//! - runs fits/evaluations and prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::Level;

use crate::cli::{Command, DataArgs, EvalArgs, FitArgs, PlotArgs, RangesArgs, ScanArgs, TuiArgs};
use crate::domain::{DataSource, FitConfig, ParameterVector};
use crate::error::AppError;
use crate::fit::{FitOptions, RangePolicy, fit_all, suggest};
use crate::io::ingest::parse_values;
use crate::models::Family;

pub mod pipeline;

/// Entry point for the `distfit` binary.
pub fn run() -> Result<(), AppError> {
    // `distfit` and `distfit -f data.csv` behave like `distfit tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log lines would corrupt the alternate screen.
    if !matches!(cli.command, Command::Tui(_)) {
        init_logging(cli.log_level);
    }

    match cli.command {
        Command::Families => handle_families(),
        Command::Fit(args) => handle_fit(args),
        Command::Eval(args) => handle_eval(args),
        Command::Ranges(args) => handle_ranges(args),
        Command::Scan(args) => handle_scan(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn init_logging(level: Level) {
    // Ignore the error when a subscriber is already installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_families() -> Result<(), AppError> {
    print!("{}", crate::report::format_families(&crate::models::entries()));
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;
    if let Some(err) = &run.fallback {
        println!("Automatic fit failed ({err}); showing default parameters instead.\n");
    }
    print_run(&run, &config, if run.automatic { "Fitted parameters" } else { "Parameters" });

    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(
            path,
            &run.loaded.sample,
            &run.params,
            run.quality.as_ref().ok(),
            config.curve_points,
        )?;
        println!("Curve written to {}", path.display());
    }
    if let Some(path) = &config.export_metrics {
        let row = crate::domain::FamilyFit {
            family: run.params.family(),
            params: Ok(run.params.clone()),
            quality: Some(run.quality.clone()),
        };
        crate::io::export::write_metrics_csv(path, &[row])?;
        println!("Metrics written to {}", path.display());
    }
    Ok(())
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let params = parse_values(&args.params)
        .map_err(|e| AppError::new(2, format!("Invalid --params: {e}")))?;
    // Validate before touching the data source.
    ParameterVector::new(args.family, params.clone())?;

    let config = FitConfig {
        source: data_source(&args.data, false)?,
        family: args.family,
        manual_params: Some(params),
        fit_options: FitOptions::default(),
        range_policy: RangePolicy::default(),
        curve_points: args.plot.points,
        plot: args.plot.plot && !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_curve: args.export_curve.clone(),
        export_metrics: None,
    };
    let run = pipeline::run_fit(&config)?;
    print_run(&run, &config, "Parameters");

    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(
            path,
            &run.loaded.sample,
            &run.params,
            run.quality.as_ref().ok(),
            config.curve_points,
        )?;
        println!("Curve written to {}", path.display());
    }
    Ok(())
}

fn print_run(run: &pipeline::FitRun, config: &FitConfig, title: &str) {
    println!("Data: {}", run.loaded.origin);
    if !run.loaded.row_errors.is_empty() {
        println!("Skipped {} non-numeric cell(s).", run.loaded.row_errors.len());
    }
    println!();
    println!("{}", crate::report::format_summary(&run.loaded.sample.summary()));
    println!("{}", crate::report::format_parameters(&run.params, title));
    println!("{}", crate::report::format_quality(&run.quality));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.loaded.sample,
            &run.curve,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }
}

fn handle_ranges(args: RangesArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_sample(&data_source(&args.data, false)?)?;
    let hints = suggest(
        &loaded.sample,
        args.family,
        &FitOptions::default(),
        &RangePolicy::default(),
    );
    print!("{}", crate::report::format_ranges(args.family, &hints));
    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_sample(&data_source(&args.data, false)?)?;
    let opts = FitOptions {
        max_iterations: args.max_iterations,
        ..FitOptions::default()
    };
    let fits = fit_all(&loaded.sample, &opts);

    println!("Data: {}\n", loaded.origin);
    println!("{}", crate::report::format_summary(&loaded.sample.summary()));
    print!("{}", crate::report::format_scan(&fits));

    if let Some(path) = &args.export_metrics {
        crate::io::export::write_metrics_csv(path, &fits)?;
        println!("\nMetrics written to {}", path.display());
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let params: Vec<String> = curve
        .parameters
        .iter()
        .map(|p| format!("{}={:.6}", p.name, p.value))
        .collect();
    println!("{} ({})", curve.family, params.join(", "));
    println!(
        "{}",
        crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height)
    );
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let source = data_source(&args.data, true)?;
    let loaded = pipeline::load_sample(&source)?;
    crate::tui::run(loaded, args.family.unwrap_or(Family::Normal))
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    if args.max_iterations == 0 {
        return Err(AppError::new(2, "--max-iterations must be > 0."));
    }
    Ok(FitConfig {
        source: data_source(&args.data, true)?,
        family: args.family,
        manual_params: None,
        fit_options: FitOptions {
            max_iterations: args.max_iterations,
            ..FitOptions::default()
        },
        range_policy: RangePolicy::default(),
        curve_points: args.plot.points,
        plot: args.plot.plot && !args.plot.no_plot,
        plot_width: args.plot.width,
        plot_height: args.plot.height,
        export_curve: args.export_curve.clone(),
        export_metrics: args.export_metrics.clone(),
    })
}

/// Turn the shared data flags into a `DataSource`.
///
/// Without any source flag, `allow_prompt` selects the interactive picker;
/// otherwise it is a usage error.
pub fn data_source(args: &DataArgs, allow_prompt: bool) -> Result<DataSource, AppError> {
    if let Some(text) = &args.values {
        return Ok(DataSource::Values(text.clone()));
    }
    if let Some(path) = &args.file {
        return Ok(DataSource::File {
            path: crate::cli::picker::validate_data_path(path)?,
            column: args.column.clone(),
        });
    }
    if let Some(url) = &args.url {
        return Ok(DataSource::Url {
            url: url.clone(),
            column: args.column.clone(),
        });
    }
    if let Some(family) = args.synthetic {
        let params = match &args.synthetic_params {
            Some(text) => parse_values(text)
                .map_err(|e| AppError::new(2, format!("Invalid --synthetic-params: {e}")))?,
            None => synthetic_defaults(family),
        };
        return Ok(DataSource::Synthetic {
            family,
            params,
            n: args.n,
            seed: args.seed,
        });
    }
    if allow_prompt {
        return Ok(DataSource::Prompt);
    }
    Err(AppError::new(
        2,
        "No data source. Use --values, -f/--file, --url or --synthetic.",
    ))
}

/// Parameters for `--synthetic` without `--synthetic-params`: shapes 2, loc 0, scale 1.
fn synthetic_defaults(family: Family) -> Vec<f64> {
    family
        .params()
        .iter()
        .map(|p| match p.role {
            crate::models::ParamRole::Shape => 2.0,
            crate::models::ParamRole::Location => 0.0,
            crate::models::ParamRole::Scale => 1.0,
        })
        .collect()
}

/// Rewrite argv so `distfit` defaults to `distfit tui`.
///
/// Rules:
/// - `distfit`                      -> `distfit tui`
/// - `distfit -f data.csv ...`      -> `distfit tui -f data.csv ...`
/// - `distfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may precede the subcommand; look past them.
    let first_positional = (1..argv.len())
        .find(|&i| !argv[i].starts_with('-') && argv[i - 1] != "--log-level");

    let has_subcommand = first_positional.is_some_and(|i| {
        matches!(
            argv[i].as_str(),
            "families" | "fit" | "eval" | "ranges" | "scan" | "plot" | "tui"
        )
    });
    if has_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["distfit"])), argv(&["distfit", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["distfit", "-f", "x.csv"])),
            argv(&["distfit", "tui", "-f", "x.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_are_untouched() {
        let args = argv(&["distfit", "--log-level", "debug", "scan", "--values", "1,2"]);
        assert_eq!(rewrite_args(args.clone()), args);
        assert_eq!(rewrite_args(argv(&["distfit", "--help"])), argv(&["distfit", "--help"]));
    }

    #[test]
    fn synthetic_flags_build_a_source() {
        let args = DataArgs {
            synthetic: Some(Family::Gamma),
            n: 10,
            seed: 3,
            ..DataArgs::default()
        };
        assert_eq!(
            data_source(&args, false).unwrap(),
            DataSource::Synthetic {
                family: Family::Gamma,
                params: vec![2.0, 0.0, 1.0],
                n: 10,
                seed: 3,
            }
        );
    }

    #[test]
    fn missing_source_prompts_only_when_allowed() {
        let args = DataArgs::default();
        assert_eq!(data_source(&args, true).unwrap(), DataSource::Prompt);
        assert_eq!(data_source(&args, false).unwrap_err().exit_code(), 2);
    }
}
