//! Goodness-of-fit metrics.
//!
//! For a sample and a candidate density we report:
//!
//! - MSE and max absolute error between the `auto`-binned histogram density and
//!   the model density at the bin midpoints
//! - the one-sample Kolmogorov–Smirnov statistic and its approximate p-value

use crate::domain::{QualityReport, Sample};
use crate::error::FitError;
use crate::fit::histogram::Histogram;
use crate::math::{ks_p_value, ks_statistic};
use crate::models::{Family, FrozenDistribution};

/// Anything with a density and a CDF can be scored.
pub trait DensityModel {
    fn pdf(&self, x: f64) -> f64;
    fn cdf(&self, x: f64) -> f64;

    /// Name used in error messages.
    fn label(&self) -> String {
        "custom model".to_string()
    }
}

impl DensityModel for FrozenDistribution {
    fn pdf(&self, x: f64) -> f64 {
        FrozenDistribution::pdf(self, x)
    }

    fn cdf(&self, x: f64) -> f64 {
        FrozenDistribution::cdf(self, x)
    }

    fn label(&self) -> String {
        self.family().display_name().to_string()
    }
}

/// Score `params` for `family` against `sample`.
///
/// Parameter-domain violations surface as `EvaluationError` so a bad manual
/// edit never looks like a catalog problem.
pub fn evaluate(sample: &Sample, family: Family, params: &[f64]) -> Result<QualityReport, FitError> {
    let dist = FrozenDistribution::new(family, params).map_err(|err| match err {
        FitError::InvalidParameters { family, reason } => {
            FitError::EvaluationError { family, reason }
        }
        other => other,
    })?;
    evaluate_model(sample, &dist)
}

/// Score an arbitrary [`DensityModel`] against `sample`.
pub fn evaluate_model<M: DensityModel + ?Sized>(
    sample: &Sample,
    model: &M,
) -> Result<QualityReport, FitError> {
    let fail = |reason: String| FitError::EvaluationError {
        family: model.label(),
        reason,
    };

    if sample.distinct_count() < 2 {
        return Err(fail("need at least 2 distinct values to bin the sample".to_string()));
    }

    let hist = Histogram::auto(sample);
    let mut sum_sq = 0.0;
    let mut max_error = 0.0_f64;
    for (x, empirical) in hist.centers().into_iter().zip(&hist.density) {
        let fitted = model.pdf(x);
        if !fitted.is_finite() {
            return Err(fail(format!("density is not finite at x = {x}")));
        }
        let diff = (fitted - empirical).abs();
        sum_sq += diff * diff;
        max_error = max_error.max(diff);
    }
    let mse = sum_sq / hist.bins() as f64;

    let ks = ks_statistic(sample.sorted(), |x| model.cdf(x));
    if !ks.is_finite() {
        return Err(fail("KS statistic is not finite".to_string()));
    }

    Ok(QualityReport {
        mse,
        max_error,
        ks_statistic: ks,
        ks_p_value: ks_p_value(ks, sample.len()),
    })
}
