//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and evaluation
//! - exported to JSON/CSV
//! - handed to the terminal renderers unchanged

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, FitError};
use crate::fit::{FitOptions, RangePolicy};
use crate::models::{Family, FrozenDistribution, ParamRole};

/// Conventional significance threshold for the KS verdict.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Why a raw value list cannot become a [`Sample`].
///
/// These are data-source errors: they are reported while ingesting, before the
/// engine ever sees the values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("sample is empty")]
    Empty,
    #[error("value #{index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },
}

impl From<SampleError> for AppError {
    fn from(err: SampleError) -> Self {
        AppError::new(2, format!("Invalid data: {err}"))
    }
}

/// A non-empty, immutable collection of finite observations.
///
/// A sorted copy is kept alongside the original order for order statistics
/// (KS test, quantiles, histogram bounds).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    sorted: Vec<f64>,
}

#[allow(clippy::len_without_is_empty)]
impl Sample {
    pub fn new(values: Vec<f64>) -> Result<Self, SampleError> {
        if values.is_empty() {
            return Err(SampleError::Empty);
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SampleError::NonFinite { index, value });
        }
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        Ok(Self { values, sorted })
    }

    /// Observations in their original order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Observations in ascending order.
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    pub fn range(&self) -> f64 {
        self.max() - self.min()
    }

    /// Range, or `max(|min|, 1)` when every value is identical.
    ///
    /// Used wherever a strictly positive length scale is needed (slider
    /// bounds, plot padding, optimizer boxes).
    pub fn spread(&self) -> f64 {
        let range = self.range();
        if range > 0.0 {
            range
        } else {
            self.min().abs().max(1.0)
        }
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.len() as f64
    }

    /// Population variance (divides by `n`).
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / self.len() as f64
    }

    /// Population standard deviation (divides by `n`).
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Linear-interpolated quantile, `q` in `[0, 1]`.
    pub fn quantile(&self, q: f64) -> f64 {
        let q = q.clamp(0.0, 1.0);
        let pos = q * (self.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        self.sorted[lo] + frac * (self.sorted[hi] - self.sorted[lo])
    }

    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Number of distinct values.
    pub fn distinct_count(&self) -> usize {
        let mut count = 1;
        for w in self.sorted.windows(2) {
            if w[1] != w[0] {
                count += 1;
            }
        }
        count
    }

    pub fn summary(&self) -> SampleSummary {
        SampleSummary {
            count: self.len(),
            mean: self.mean(),
            std_dev: self.std_dev(),
            min: self.min(),
            max: self.max(),
            median: self.median(),
        }
    }
}

/// Descriptive statistics shown next to every fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Parameter values bound to a family schema.
///
/// Construction validates length and domain constraints, so a
/// `ParameterVector` can always be frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    family: Family,
    values: Vec<f64>,
}

impl ParameterVector {
    pub fn new(family: Family, values: Vec<f64>) -> Result<Self, FitError> {
        FrozenDistribution::new(family, &values)?;
        Ok(Self { family, values })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn freeze(&self) -> Result<FrozenDistribution, FitError> {
        FrozenDistribution::new(self.family, &self.values)
    }

    /// Parameter table: schema names paired with values.
    pub fn rows(&self) -> Vec<ParameterRow> {
        self.family
            .params()
            .iter()
            .zip(&self.values)
            .map(|(spec, &value)| ParameterRow {
                name: spec.name.to_string(),
                role: spec.role,
                value,
            })
            .collect()
    }
}

/// One row of a parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub name: String,
    pub role: ParamRole,
    pub value: f64,
}

/// Fit-quality metrics for one `(sample, family, parameters)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Mean squared difference between histogram density and fitted density.
    pub mse: f64,
    /// Largest absolute difference between histogram density and fitted density.
    pub max_error: f64,
    /// Kolmogorov–Smirnov statistic (largest ECDF vs fitted CDF gap).
    pub ks_statistic: f64,
    /// Approximate KS p-value under "sample drawn from the fitted model".
    pub ks_p_value: f64,
}

impl QualityReport {
    pub fn verdict(&self) -> FitVerdict {
        if self.ks_p_value > SIGNIFICANCE_LEVEL {
            FitVerdict::Good
        } else {
            FitVerdict::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitVerdict {
    Good,
    Poor,
}

impl FitVerdict {
    /// Lowercase keyword for tables and CSV.
    pub fn keyword(self) -> &'static str {
        match self {
            FitVerdict::Good => "good",
            FitVerdict::Poor => "poor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitVerdict::Good => "Good fit (p > 0.05)",
            FitVerdict::Poor => "Poor fit (p <= 0.05)",
        }
    }
}

/// Slider bounds for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRangeHint {
    pub name: String,
    pub role: ParamRole,
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
    pub default: f64,
}

impl ParameterRangeHint {
    /// Clamp a caller-edited value into `[lower, upper]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Automatic fit + evaluation of one family (`scan` output, debug bundles).
#[derive(Debug, Clone)]
pub struct FamilyFit {
    pub family: Family,
    pub params: Result<ParameterVector, FitError>,
    pub quality: Option<Result<QualityReport, FitError>>,
}

/// Where the sample comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Comma and/or whitespace separated numbers.
    Values(String),
    /// A CSV file; `column` defaults to the first all-numeric column.
    File {
        path: PathBuf,
        column: Option<String>,
    },
    /// A CSV or plain list fetched over HTTP.
    Url { url: String, column: Option<String> },
    /// Seeded synthetic draw from a catalog family.
    Synthetic {
        family: Family,
        params: Vec<f64>,
        n: usize,
        seed: u64,
    },
    /// Ask interactively for a CSV under the working directory.
    Prompt,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub source: DataSource,
    pub family: Family,
    /// Manual parameters; when absent the family is fitted automatically.
    pub manual_params: Option<Vec<f64>>,

    pub fit_options: FitOptions,
    pub range_policy: RangePolicy,

    pub curve_points: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_curve: Option<PathBuf>,
    pub export_metrics: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub family: Family,
    pub parameters: Vec<ParameterRow>,
    pub quality: Option<QualityReport>,
    pub summary: SampleSummary,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}
