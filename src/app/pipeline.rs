//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! data source -> sample -> automatic fit (or manual params) -> quality -> curve
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{info, warn};

use crate::cli::picker::{is_csv, prompt_for_data_path};
use crate::data::{RemoteSource, generate_sample};
use crate::domain::{DataSource, FitConfig, ParameterVector, QualityReport, Sample};
use crate::error::{AppError, FitError};
use crate::fit::{defaults, evaluate, fit, suggest_with};
use crate::io::ingest::{IngestedValues, RowError, load_csv_column, parse_document, parse_values};
use crate::models::{curve, default_domain};

/// A validated sample plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub sample: Sample,
    /// Human-readable origin (`file.csv [column]`, `inline values`, ...).
    pub origin: String,
    /// CSV cells that were skipped.
    pub row_errors: Vec<RowError>,
}

/// All computed outputs of a single `fit`/`eval` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub loaded: LoadedSample,
    pub params: ParameterVector,
    /// `false` when the parameters were supplied manually or are fallback defaults.
    pub automatic: bool,
    /// Why the automatic fit was replaced by slider defaults, if it was.
    pub fallback: Option<FitError>,
    pub quality: Result<QualityReport, FitError>,
    pub curve: Vec<(f64, f64)>,
}

/// Resolve a data source into a validated sample.
pub fn load_sample(source: &DataSource) -> Result<LoadedSample, AppError> {
    let (values, origin, row_errors) = match source {
        DataSource::Values(text) => (parse_values(text)?, "inline values".to_string(), Vec::new()),
        DataSource::File { path, column } => {
            let ingested = if is_csv(path) {
                load_csv_column(path, column.as_deref())?
            } else {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AppError::new(2, format!("Failed to read '{}': {e}", path.display()))
                })?;
                parse_document(&text, column.as_deref())?
            };
            let origin = describe(&path.display().to_string(), &ingested);
            (ingested.values, origin, ingested.row_errors)
        }
        DataSource::Url { url, column } => {
            let remote = RemoteSource::from_env()?;
            let url = remote.resolve_url(Some(url.as_str()))?;
            let ingested = remote.fetch(url, column.as_deref())?;
            let origin = describe(url, &ingested);
            (ingested.values, origin, ingested.row_errors)
        }
        DataSource::Synthetic {
            family,
            params,
            n,
            seed,
        } => {
            let sample = generate_sample(*family, params, *n, *seed)?;
            let origin = format!("synthetic {family} (n={n}, seed={seed})");
            return Ok(LoadedSample {
                sample,
                origin,
                row_errors: Vec::new(),
            });
        }
        DataSource::Prompt => {
            let path = prompt_for_data_path()?;
            return load_sample(&DataSource::File { path, column: None });
        }
    };

    if !row_errors.is_empty() {
        warn!(origin = %origin, skipped = row_errors.len(), "skipped non-numeric cells");
    }
    let sample = Sample::new(values)?;
    info!(origin = %origin, n = sample.len(), "sample loaded");
    Ok(LoadedSample {
        sample,
        origin,
        row_errors,
    })
}

fn describe(location: &str, ingested: &IngestedValues) -> String {
    match &ingested.column {
        Some(col) => format!("{location} [{col}]"),
        None => location.to_string(),
    }
}

/// Execute the full pipeline for one family.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let loaded = load_sample(&config.source)?;
    run_fit_on(loaded, config)
}

/// Execute the pipeline on an already loaded sample.
///
/// Manual parameters must be valid (`InvalidParameters` otherwise). A failed
/// automatic fit is not fatal: the run continues with the advisor's defaults
/// and records the reason in `fallback`.
pub fn run_fit_on(loaded: LoadedSample, config: &FitConfig) -> Result<FitRun, AppError> {
    let family = config.family;
    let sample = &loaded.sample;

    let (params, automatic, fallback) = match &config.manual_params {
        Some(values) => (ParameterVector::new(family, values.clone())?, false, None),
        None => match fit(sample, family, &config.fit_options) {
            Ok(p) => (p, true, None),
            Err(err) => {
                warn!(family = %family, error = %err, "automatic fit failed; using slider defaults");
                let hints = suggest_with(sample, family, None, &config.range_policy);
                (ParameterVector::new(family, defaults(&hints))?, false, Some(err))
            }
        },
    };

    let quality = evaluate(sample, family, params.values());
    let (lo, hi) = default_domain(sample);
    let curve = curve(family, params.values(), lo, hi, config.curve_points)?;

    Ok(FitRun {
        loaded,
        params,
        automatic,
        fallback,
        quality,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{FitOptions, RangePolicy};
    use crate::models::Family;

    fn config(source: DataSource, family: Family) -> FitConfig {
        FitConfig {
            source,
            family,
            manual_params: None,
            fit_options: FitOptions::default(),
            range_policy: RangePolicy::default(),
            curve_points: 50,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_curve: None,
            export_metrics: None,
        }
    }

    #[test]
    fn inline_values_fit_normal() {
        let cfg = config(DataSource::Values("3 4 4 5 5 5 6 6 7".to_string()), Family::Normal);
        let run = run_fit(&cfg).unwrap();
        assert!(run.automatic);
        assert!((run.params.values()[0] - 5.0).abs() < 1e-9);
        assert!((run.params.values()[1] - 1.1547).abs() < 1e-4);
        assert_eq!(run.curve.len(), 50);
        assert!(run.quality.is_ok());
    }

    #[test]
    fn manual_params_are_validated() {
        let mut cfg = config(DataSource::Values("1,2,3".to_string()), Family::Normal);
        cfg.manual_params = Some(vec![0.0, -1.0]);
        let err = run_fit(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn failed_fit_falls_back_to_defaults() {
        let cfg = config(DataSource::Values("2 2 2".to_string()), Family::Gamma);
        let run = run_fit(&cfg).unwrap();
        assert!(!run.automatic);
        assert!(matches!(run.fallback, Some(FitError::DegenerateSample { .. })));
        assert!(run.quality.is_err());
    }

    #[test]
    fn synthetic_source_is_seeded() {
        let source = DataSource::Synthetic {
            family: Family::Exponential,
            params: vec![0.0, 2.0],
            n: 200,
            seed: 7,
        };
        let a = load_sample(&source).unwrap();
        let b = load_sample(&source).unwrap();
        assert_eq!(a.sample, b.sample);
        assert!(a.origin.starts_with("synthetic Exponential"));
    }

    #[test]
    fn plain_text_files_are_value_lists() {
        let path = std::env::temp_dir().join(format!("distfit-values-{}.txt", std::process::id()));
        std::fs::write(&path, "1.5 2.5\n3.5").unwrap();
        let loaded = load_sample(&DataSource::File {
            path: path.clone(),
            column: None,
        })
        .unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.sample.values(), &[1.5, 2.5, 3.5]);
    }
}
